//! Elliptic Curve Keys as defined in [section 6.2 of RFC 7518]
//!
//! Key material arrives as the untrusted `crv`/`x`/`y`/`d` parameters of
//! a JWK. It is validated against the exact field sizes of the named
//! curve before any curve arithmetic runs, so every malformation is
//! reported as a typed error instead of surfacing as an opaque failure
//! from the primitives.
//!
//! [section 6.2 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2>

use alloc::{
    format,
    string::{String, ToString as _},
    vec::Vec,
};
use core::fmt;

use secrecy::SecretSlice;
use serde::{de::Error as _, Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize as _;

use crate::{
    base64_url::{self, Base64UrlString},
    crypto::{self, ec as backend},
};

/// A P-Curve from the [JSON Web Key Elliptic Curve registry]
///
/// Each curve fixes the exact byte length of its coordinates and private
/// scalar. There is no default: a `crv` value outside this registry is
/// rejected during validation.
///
/// [JSON Web Key Elliptic Curve registry]: <https://www.iana.org/assignments/jose/jose.xhtml#web-key-elliptic-curve>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EllipticCurve {
    /// P-256 Curve as defined in [section 6.2.1.1 of RFC 7518]
    ///
    /// [section 6.2.1.1 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2.1.1>
    P256,
    /// P-384 Curve as defined in [section 6.2.1.1 of RFC 7518]
    ///
    /// [section 6.2.1.1 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2.1.1>
    P384,
    /// P-521 Curve as defined in [section 6.2.1.1 of RFC 7518]
    ///
    /// [section 6.2.1.1 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2.1.1>
    P521,
}

impl EllipticCurve {
    /// The name of the curve, that is also used in the `crv` parameter of
    /// a JWK.
    pub const fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// The exact byte length of one coordinate (and of the private
    /// scalar) on this curve.
    pub const fn coordinate_len(self) -> usize {
        match self {
            Self::P256 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }

    /// Looks up a curve by its `crv` parameter value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Self::P256),
            "P-384" => Some(Self::P384),
            "P-521" => Some(Self::P521),
            _ => None,
        }
    }
}

impl fmt::Display for EllipticCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The JWK parameter a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcParameter {
    /// The `x` coordinate
    X,
    /// The `y` coordinate
    Y,
    /// The private scalar `d`
    D,
}

impl EcParameter {
    const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::D => "d",
        }
    }
}

impl fmt::Display for EcParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The reasons a JWK-shaped record can be rejected before or during key
/// construction.
///
/// Validation failures carry the parameter and the expected and actual
/// lengths, so callers can tell apart a missing field, a field of the
/// wrong size and material the curve arithmetic itself rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EcKeyError {
    /// The `crv` parameter is missing or empty.
    #[error("the `crv` parameter is missing")]
    MissingCurve,
    /// The `crv` parameter does not name a registered curve.
    #[error("unknown curve `{0}`")]
    UnknownCurve(String),
    /// A required public coordinate is missing.
    #[error("the `{0}` parameter is missing")]
    MissingCoordinate(EcParameter),
    /// A parameter is not valid base64url.
    #[error("the `{0}` parameter is not valid base64url")]
    InvalidBase64(EcParameter),
    /// A public coordinate does not have the curve's exact byte length.
    #[error("the `{parameter}` parameter must be {expected} bytes on {curve}, got {actual}")]
    InvalidCoordinateLength {
        /// The coordinate with the wrong length.
        parameter: EcParameter,
        /// The curve named by the `crv` parameter.
        curve: EllipticCurve,
        /// The coordinate length required by the curve.
        expected: usize,
        /// The decoded length of the rejected coordinate.
        actual: usize,
    },
    /// The `d` parameter is missing but private key use was requested.
    #[error("the `d` parameter is required for private key use")]
    MissingPrivateScalar,
    /// The `d` parameter does not have the curve's exact byte length.
    #[error("the `d` parameter must be {expected} bytes on {curve}, got {actual}")]
    InvalidPrivateScalarLength {
        /// The curve named by the `crv` parameter.
        curve: EllipticCurve,
        /// The scalar length required by the curve.
        expected: usize,
        /// The decoded length of the rejected scalar.
        actual: usize,
    },
    /// The curve arithmetic rejected well-sized key material, for example
    /// because the coordinates do not name a point on the curve or the
    /// scalar does not match the public point.
    #[error("curve arithmetic rejected the key material: {0}")]
    Construction(crypto::Error),
}

/// The raw, untrusted parameters of an EC JWK as handed over by a key
/// material supplier.
///
/// All fields are optional strings: presence, base64url validity and
/// lengths are only checked by [`EcKeyMaterial::from_jwk`]. The `d`
/// parameter is carried as an opaque string here; the decoded scalar is
/// wrapped in a [`SecretSlice`] during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEcJwk {
    /// The `crv` parameter naming the curve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// The base64url encoded `x` coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// The base64url encoded `y` coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// The base64url encoded private scalar `d`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

/// Validated key material for an EC key.
///
/// The coordinates (and the scalar, if present) are guaranteed to have
/// the exact byte length of the curve. The material is only a size
/// guarantee: whether the coordinates name a point on the curve is
/// decided by [`EcKey::construct`].
pub struct EcKeyMaterial {
    curve: EllipticCurve,
    x: Vec<u8>,
    y: Vec<u8>,
    d: Option<SecretSlice<u8>>,
}

impl EcKeyMaterial {
    /// Validates the raw JWK parameters against the named curve.
    ///
    /// The checks run in a fixed order: curve identification first, then
    /// presence and decoding of the public coordinates, then their
    /// lengths, and only when `use_private_key` is set, presence,
    /// decoding and length of `d`. A `d` parameter on the record is
    /// ignored when private key use is not requested.
    ///
    /// # Errors
    ///
    /// Returns the [`EcKeyError`] for the first rule the record violates.
    pub fn from_jwk(raw: &RawEcJwk, use_private_key: bool) -> Result<Self, EcKeyError> {
        let crv = raw
            .crv
            .as_deref()
            .filter(|crv| !crv.is_empty())
            .ok_or(EcKeyError::MissingCurve)?;
        let curve =
            EllipticCurve::from_name(crv).ok_or_else(|| EcKeyError::UnknownCurve(crv.to_string()))?;

        let x = raw
            .x
            .as_deref()
            .ok_or(EcKeyError::MissingCoordinate(EcParameter::X))?;
        let y = raw
            .y
            .as_deref()
            .ok_or(EcKeyError::MissingCoordinate(EcParameter::Y))?;

        let x = decode_coordinate(curve, EcParameter::X, x)?;
        let y = decode_coordinate(curve, EcParameter::Y, y)?;

        let d = if use_private_key {
            let d = raw.d.as_deref().ok_or(EcKeyError::MissingPrivateScalar)?;
            Some(decode_scalar(curve, d)?)
        } else {
            None
        };

        Ok(Self { curve, x, y, d })
    }

    /// The curve this material was validated against.
    pub const fn curve(&self) -> EllipticCurve {
        self.curve
    }

    /// Whether the material carries a private scalar.
    pub const fn has_private_scalar(&self) -> bool {
        self.d.is_some()
    }
}

impl fmt::Debug for EcKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyMaterial")
            .field("curve", &self.curve)
            .field("x", &Base64UrlString::encode(&self.x))
            .field("y", &Base64UrlString::encode(&self.y))
            .field("d", &self.d.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn decode_coordinate(
    curve: EllipticCurve,
    parameter: EcParameter,
    value: &str,
) -> Result<Vec<u8>, EcKeyError> {
    let bytes = base64_url::decode(value).map_err(|_| EcKeyError::InvalidBase64(parameter))?;

    let expected = curve.coordinate_len();
    if bytes.len() != expected {
        return Err(EcKeyError::InvalidCoordinateLength {
            parameter,
            curve,
            expected,
            actual: bytes.len(),
        });
    }

    Ok(bytes)
}

fn decode_scalar(curve: EllipticCurve, value: &str) -> Result<SecretSlice<u8>, EcKeyError> {
    let mut bytes =
        base64_url::decode(value).map_err(|_| EcKeyError::InvalidBase64(EcParameter::D))?;

    let expected = curve.coordinate_len();
    if bytes.len() != expected {
        let actual = bytes.len();
        bytes.zeroize();
        return Err(EcKeyError::InvalidPrivateScalarLength {
            curve,
            expected,
            actual,
        });
    }

    Ok(SecretSlice::from(bytes))
}

/// An Elliptic Curve Key as defined in [section 6.2 of RFC 7518]
///
/// A key constructed without a private scalar supports verification
/// only; one constructed with `d` supports signing and verification.
///
/// [section 6.2 of RFC 7518]: <https://datatracker.ietf.org/doc/html/rfc7518#section-6.2>
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcKey {
    /// A key holding only the public point.
    Public(EcPublicKey),
    /// A key holding the public point and the private scalar.
    Private(EcPrivateKey),
}

impl EcKey {
    /// Runs the full pipeline: validates the raw parameters and
    /// constructs the native key object.
    ///
    /// # Errors
    ///
    /// Returns an [`EcKeyError`] if validation or construction fails.
    pub fn from_jwk(raw: &RawEcJwk, use_private_key: bool) -> Result<Self, EcKeyError> {
        EcKeyMaterial::from_jwk(raw, use_private_key).and_then(Self::construct)
    }

    /// Builds the native key object from validated material.
    ///
    /// # Errors
    ///
    /// Returns [`EcKeyError::Construction`] if the curve arithmetic
    /// rejects the material, for example because the coordinates do not
    /// name a point on the curve or the scalar does not match the public
    /// point. The underlying cause is preserved for diagnostics.
    pub fn construct(material: EcKeyMaterial) -> Result<Self, EcKeyError> {
        let EcKeyMaterial { curve, x, y, d } = material;

        Ok(match d {
            Some(d) => Self::Private(EcPrivateKey {
                inner: backend::PrivateKey::new(curve, &x, &y, &d)
                    .map_err(EcKeyError::Construction)?,
            }),
            None => Self::Public(EcPublicKey {
                inner: backend::PublicKey::new(curve, &x, &y).map_err(EcKeyError::Construction)?,
            }),
        })
    }

    /// The curve this key lives on.
    pub fn curve(&self) -> EllipticCurve {
        match self {
            Self::Public(key) => key.curve(),
            Self::Private(key) => key.curve(),
        }
    }

    /// Returns the public part of this key.
    pub fn to_public_key(&self) -> EcPublicKey {
        match self {
            Self::Public(key) => key.clone(),
            Self::Private(key) => key.to_public_key(),
        }
    }
}

impl Serialize for EcKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Public(key) => key.serialize(serializer),
            Self::Private(key) => key.serialize(serializer),
        }
    }
}

/// An EC public key usable for signature verification.
#[derive(Clone)]
pub struct EcPublicKey {
    pub(crate) inner: backend::PublicKey,
}

impl EcPublicKey {
    /// The curve this key lives on.
    pub fn curve(&self) -> EllipticCurve {
        self.inner.curve()
    }

    /// Returns the `(x, y)` coordinates of the public point as
    /// big-endian bytes, left padded to the curve's coordinate length.
    pub fn to_point(&self) -> (&[u8], &[u8]) {
        self.inner.to_point()
    }

    pub(crate) fn verify(
        &self,
        digest: crate::jwa::MessageDigest,
        msg: &[u8],
        signature: &[u8],
    ) -> crypto::Result<bool> {
        self.inner.verify(digest, msg, signature)
    }
}

impl Eq for EcPublicKey {}
impl PartialEq for EcPublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.curve() == other.curve() && self.to_point() == other.to_point()
    }
}

impl fmt::Debug for EcPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.to_point();

        f.debug_struct("EcPublicKey")
            .field("crv", &self.curve().name())
            .field("x", &Base64UrlString::encode(x))
            .field("y", &Base64UrlString::encode(y))
            .finish()
    }
}

impl Serialize for EcPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Repr<'a> {
            kty: &'a str,
            crv: &'a str,
            x: Base64UrlString,
            y: Base64UrlString,
        }

        let (x, y) = self.to_point();

        Repr {
            kty: "EC",
            crv: self.curve().name(),
            x: Base64UrlString::encode(x),
            y: Base64UrlString::encode(y),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EcPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            kty: String,
            crv: Option<String>,
            x: Option<String>,
            y: Option<String>,
        }

        let repr = Repr::deserialize(deserializer)?;

        if repr.kty != "EC" {
            return Err(D::Error::custom(format!(
                "Invalid key type `{}`. Expected: `EC`",
                repr.kty,
            )));
        }

        let raw = RawEcJwk {
            crv: repr.crv,
            x: repr.x,
            y: repr.y,
            d: None,
        };

        match EcKey::from_jwk(&raw, false)
            .map_err(|e| D::Error::custom(format!("failed to construct public EC key: {e}")))?
        {
            EcKey::Public(key) => Ok(key),
            EcKey::Private(_) => Err(D::Error::custom("unexpected private key")),
        }
    }
}

/// An EC private key usable for signing and, through its public part,
/// verification.
#[derive(Clone)]
pub struct EcPrivateKey {
    pub(crate) inner: backend::PrivateKey,
}

impl EcPrivateKey {
    /// Generates a new key on the given curve using the operating system
    /// RNG.
    pub fn generate(curve: EllipticCurve) -> Self {
        Self {
            inner: backend::PrivateKey::generate(curve),
        }
    }

    /// The curve this key lives on.
    pub fn curve(&self) -> EllipticCurve {
        self.inner.curve()
    }

    /// Returns the public key of this private key.
    pub fn to_public_key(&self) -> EcPublicKey {
        EcPublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    pub(crate) fn sign(
        &self,
        digest: crate::jwa::MessageDigest,
        msg: &[u8],
        deterministic: bool,
    ) -> crypto::Result<crypto::Signature> {
        self.inner.sign(digest, msg, deterministic)
    }
}

impl Eq for EcPrivateKey {}
impl PartialEq for EcPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_public_key() == other.to_public_key()
    }
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.inner.public_point();

        f.debug_struct("EcPrivateKey")
            .field("crv", &self.curve().name())
            .field("x", &Base64UrlString::encode(x))
            .field("y", &Base64UrlString::encode(y))
            .field("d", &"[REDACTED]")
            .finish()
    }
}

impl Serialize for EcPrivateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Repr<'a> {
            kty: &'a str,
            crv: &'a str,
            x: Base64UrlString,
            y: Base64UrlString,
            d: &'a str,
        }

        let (x, y) = self.inner.public_point();
        let d = base64_url::encode_secret(self.inner.private_material());

        Repr {
            kty: "EC",
            crv: self.curve().name(),
            x: Base64UrlString::encode(x),
            y: Base64UrlString::encode(y),
            d: d.as_str(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EcPrivateKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            kty: String,
            crv: Option<String>,
            x: Option<String>,
            y: Option<String>,
            d: Option<String>,
        }

        let repr = Repr::deserialize(deserializer)?;

        if repr.kty != "EC" {
            return Err(D::Error::custom(format!(
                "Invalid key type `{}`. Expected: `EC`",
                repr.kty,
            )));
        }

        let raw = RawEcJwk {
            crv: repr.crv,
            x: repr.x,
            y: repr.y,
            d: repr.d,
        };

        match EcKey::from_jwk(&raw, true)
            .map_err(|e| D::Error::custom(format!("failed to construct private EC key: {e}")))?
        {
            EcKey::Private(key) => Ok(key),
            EcKey::Public(_) => Err(D::Error::custom("unexpected public key")),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn curve_registry() {
        assert_eq!(EllipticCurve::from_name("P-256"), Some(EllipticCurve::P256));
        assert_eq!(EllipticCurve::from_name("P-384"), Some(EllipticCurve::P384));
        assert_eq!(EllipticCurve::from_name("P-521"), Some(EllipticCurve::P521));

        assert_eq!(EllipticCurve::P256.coordinate_len(), 32);
        assert_eq!(EllipticCurve::P384.coordinate_len(), 48);
        assert_eq!(EllipticCurve::P521.coordinate_len(), 66);

        assert_eq!(EllipticCurve::from_name("P-255"), None);
        assert_eq!(EllipticCurve::from_name("P-512"), None);
        assert_eq!(EllipticCurve::from_name("secp256k1"), None);
    }

    #[test]
    fn curve_is_checked_before_coordinates() {
        let raw = RawEcJwk::default();
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::MissingCurve)
        ));

        let raw = RawEcJwk {
            crv: Some("P-255".to_string()),
            ..RawEcJwk::default()
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::UnknownCurve(crv)) if crv == "P-255"
        ));
    }

    #[test]
    fn empty_curve_name_counts_as_missing() {
        let raw = RawEcJwk {
            crv: Some(String::new()),
            ..RawEcJwk::default()
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::MissingCurve)
        ));
    }

    #[test]
    fn coordinate_presence_is_checked_before_decoding() {
        let raw = RawEcJwk {
            crv: Some("P-256".to_string()),
            x: None,
            y: Some("!!!not base64url!!!".to_string()),
            d: None,
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::MissingCoordinate(EcParameter::X))
        ));
    }

    #[test]
    fn rejects_coordinates_outside_the_alphabet() {
        let raw = RawEcJwk {
            crv: Some("P-256".to_string()),
            x: Some("no spaces allowed".to_string()),
            y: Some(Base64UrlString::encode([0u8; 32]).into_inner()),
            d: None,
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::InvalidBase64(EcParameter::X))
        ));
    }

    #[test]
    fn reports_the_parameter_with_the_wrong_length() {
        let raw = RawEcJwk {
            crv: Some("P-256".to_string()),
            x: Some(Base64UrlString::encode([0u8; 31]).into_inner()),
            y: Some(Base64UrlString::encode([0u8; 32]).into_inner()),
            d: None,
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::InvalidCoordinateLength {
                parameter: EcParameter::X,
                curve: EllipticCurve::P256,
                expected: 32,
                actual: 31,
            })
        ));

        let raw = RawEcJwk {
            crv: Some("P-256".to_string()),
            x: Some(Base64UrlString::encode([0u8; 32]).into_inner()),
            y: Some(Base64UrlString::encode([0u8; 33]).into_inner()),
            d: None,
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, false),
            Err(EcKeyError::InvalidCoordinateLength {
                parameter: EcParameter::Y,
                expected: 32,
                actual: 33,
                ..
            })
        ));
    }

    #[test]
    fn private_scalar_is_only_checked_when_requested() {
        let raw = RawEcJwk {
            crv: Some("P-256".to_string()),
            x: Some(Base64UrlString::encode([0u8; 32]).into_inner()),
            y: Some(Base64UrlString::encode([0u8; 32]).into_inner()),
            d: None,
        };

        // sizes are fine, so validation passes without `d`
        let material = EcKeyMaterial::from_jwk(&raw, false).unwrap();
        assert_eq!(material.curve(), EllipticCurve::P256);
        assert!(!material.has_private_scalar());

        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, true),
            Err(EcKeyError::MissingPrivateScalar)
        ));

        let raw = RawEcJwk {
            d: Some(Base64UrlString::encode([0u8; 16]).into_inner()),
            ..raw
        };
        assert!(matches!(
            EcKeyMaterial::from_jwk(&raw, true),
            Err(EcKeyError::InvalidPrivateScalarLength {
                expected: 32,
                actual: 16,
                ..
            })
        ));
    }
}
