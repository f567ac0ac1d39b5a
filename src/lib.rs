//! Elliptic curve JSON Web Keys and ECDSA signature providers.
//!
//! This crate implements the EC subset of JSON Web Keys as defined in
//! [RFC 7517] together with the ECDSA signing algorithms of [RFC 7518]:
//! it takes the untrusted, base64url encoded `crv`/`x`/`y`/`d` parameters
//! of a JWK, validates them against the exact field sizes of the named
//! curve, constructs a native key object, and exposes signing and
//! verification through providers bound to a key and an algorithm.
//!
//! ```
//! use jose_ec::{
//!     jwa::EcDSA,
//!     jwk::{EcPrivateKey, EcSigner, EcVerifier, EllipticCurve},
//!     Signer as _, Verifier as _,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = EcPrivateKey::generate(EllipticCurve::P256);
//!
//! let mut signer = EcSigner::new(key.clone(), EcDSA::Es256);
//! let signature = signer.sign(b"GenerateASignature")?;
//!
//! let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es256);
//! assert!(verifier.verify(b"GenerateASignature", signature.as_ref())?);
//! # Ok(())
//! # }
//! ```
//!
//! [RFC 7517]: <https://datatracker.ietf.org/doc/html/rfc7517>
//! [RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518>
#![warn(
    missing_docs,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    explicit_outlives_requirements,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc
)]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    macro_use_extern_crate,
    non_ascii_idents,
    elided_lifetimes_in_paths
)]
#![forbid(unsafe_code)]
#![no_std]

extern crate alloc;

mod sign;
pub use sign::*;

mod verify;
pub use verify::*;

pub(crate) mod base64_url;
pub use base64_url::{Base64UrlString, NoBase64UrlString};

pub mod crypto;
pub mod jwa;
pub mod jwk;
