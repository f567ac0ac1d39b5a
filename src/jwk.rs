//! Implementation of the elliptic curve subset of JSON Web Keys (JWK) as
//! defined in [RFC 7517]
//!
//! [RFC 7517]: <https://datatracker.ietf.org/doc/html/rfc7517>

pub mod ec;

mod signer;
mod verifier;

#[doc(inline)]
pub use self::{
    ec::{
        EcKey, EcKeyError, EcKeyMaterial, EcParameter, EcPrivateKey, EcPublicKey, EllipticCurve,
        RawEcJwk,
    },
    signer::EcSigner,
    verifier::EcVerifier,
};

use crate::jwa::EcDSA;

/// A trait for [`Signer`](crate::Signer)s and
/// [`Verifier`](crate::Verifier)s that can be created from key material as
/// long as the algorithm is known
pub trait FromKey<K>: Sized {
    /// The error returned if the conversion failed
    type Error;

    /// Turn `K` into this signer or verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion failed
    fn from_key(key: K, alg: EcDSA) -> Result<Self, Self::Error>;
}
