//! Implementation of the ECDSA subset of JSON Web Algorithms (JWA) as
//! defined in [section 3.4 of RFC 7518]
//!
//! [section 3.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.4>

use alloc::{borrow::Cow, string::String};
use core::str::FromStr;

use serde::{de::Error as _, Deserialize, Serialize};
use thiserror::Error;

/// The error returned when an algorithm identifier is not part of the
/// ECDSA algorithm table.
///
/// There is no fallback: an identifier outside the table is rejected,
/// never mapped to a default algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a supported ECDSA signing algorithm")]
pub struct UnsupportedAlgorithmError(String);

impl UnsupportedAlgorithmError {
    /// The identifier that failed to resolve.
    pub fn algorithm(&self) -> &str {
        &self.0
    }
}

/// Digital Signature with ECDSA as defined in [section 3.4 of RFC 7518]
///
/// The registry pairs each identifier with a SHA-2 function. The curve is
/// a property of the key the algorithm is used with, not of the
/// identifier.
///
/// [section 3.4 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-3.4>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcDSA {
    /// ECDSA using SHA-256 (`ES256`)
    Es256,
    /// ECDSA using SHA-384 (`ES384`)
    Es384,
    /// ECDSA using SHA-512 (`ES512`)
    Es512,
}

impl EcDSA {
    /// The identifier of this algorithm in the IANA registry.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Es512 => "ES512",
        }
    }

    /// The SHA-2 function this algorithm hashes the payload with.
    ///
    /// The hash width is bound to the algorithm, not to the curve of the
    /// key it is paired with. Pairing a P-256 key with
    /// [`EcDSA::Es512`] is not rejected here; layers that want matching
    /// widths must enforce that themselves.
    pub const fn digest(self) -> MessageDigest {
        match self {
            Self::Es256 => MessageDigest::Sha256,
            Self::Es384 => MessageDigest::Sha384,
            Self::Es512 => MessageDigest::Sha512,
        }
    }
}

impl FromStr for EcDSA {
    type Err = UnsupportedAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        Ok(match alg {
            "ES256" => Self::Es256,
            "ES384" => Self::Es384,
            "ES512" => Self::Es512,
            _ => return Err(UnsupportedAlgorithmError(alg.into())),
        })
    }
}

impl Serialize for EcDSA {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for EcDSA {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let alg = <Cow<'_, str> as Deserialize>::deserialize(deserializer)?;
        alg.parse().map_err(D::Error::custom)
    }
}

/// The SHA-2 message digest an [`EcDSA`] algorithm is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageDigest {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}
