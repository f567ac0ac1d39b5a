//! Cryptographic primitives.
//!
//! This module wraps the RustCrypto curve arithmetic behind curve-erased
//! key objects, so the rest of the crate can work with keys whose curve
//! is only known at runtime.

pub(crate) mod ec;

pub use self::ec::Signature;

use thiserror::Error;

/// The result type used for cryptographic operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The errors that can be produced by the curve arithmetic primitives.
///
/// The exact failure reported for a given input can differ between
/// versions of the underlying libraries. Callers should treat every
/// variant as "the primitive rejected the input" and use the payload
/// for diagnostics only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A coordinate or scalar buffer does not match the curve's field
    /// size.
    #[error("invalid field element length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// The field size of the curve.
        expected: usize,
        /// The length of the rejected buffer.
        actual: usize,
    },
    /// The affine coordinates do not name a point on the curve.
    #[error("point is not on the curve")]
    InvalidPoint,
    /// The curve arithmetic rejected the key material.
    #[error("elliptic curve arithmetic rejected the key material: {0}")]
    EllipticCurve(elliptic_curve::Error),
    /// An ECDSA primitive failed while creating or checking a signature.
    #[error("ecdsa primitive failure: {0}")]
    Ecdsa(ecdsa::Error),
}
