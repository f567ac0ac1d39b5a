//! The curve arithmetic primitives for EC (elliptic curve) keys.
//!
//! Keys are stored curve-erased: every operation dispatches on the curve
//! that was chosen when the key material was validated. The message
//! digest is intentionally not part of the key. It is supplied per
//! operation by the signature providers, because the algorithm that
//! selects the digest is paired with a key only at provider construction
//! time.

use alloc::vec::Vec;
use core::fmt;

use ecdsa::EncodedPoint;
use elliptic_curve::{
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint, ValidatePublicKey as _},
    AffinePoint, CurveArithmetic, FieldBytes, FieldBytesSize, SecretKey,
};
use generic_array::typenum::Unsigned as _;
use p256::NistP256;
use p384::NistP384;
use p521::NistP521;
use rand_core::OsRng;
use secrecy::{ExposeSecret as _, SecretSlice};
use sha2::{Digest as _, Sha256, Sha384, Sha512};
use signature::hazmat::{PrehashSigner as _, PrehashVerifier as _, RandomizedPrehashSigner as _};
use zeroize::Zeroizing;

use crate::{
    crypto::{Error, Result},
    jwa::MessageDigest,
    jwk::ec::EllipticCurve,
};

#[derive(Clone)]
enum ErasedPrivateKey {
    P256 {
        key: SecretKey<NistP256>,
        public: EncodedPoint<NistP256>,
        d: Zeroizing<FieldBytes<NistP256>>,
    },
    P384 {
        key: SecretKey<NistP384>,
        public: EncodedPoint<NistP384>,
        d: Zeroizing<FieldBytes<NistP384>>,
    },
    P521 {
        key: SecretKey<NistP521>,
        public: EncodedPoint<NistP521>,
        d: Zeroizing<FieldBytes<NistP521>>,
    },
}

impl ErasedPrivateKey {
    fn new_p256(key: SecretKey<NistP256>) -> PrivateKey {
        PrivateKey {
            inner: Self::P256 {
                public: key.public_key().to_encoded_point(false),
                d: Zeroizing::new(key.to_bytes()),
                key,
            },
        }
    }

    fn new_p384(key: SecretKey<NistP384>) -> PrivateKey {
        PrivateKey {
            inner: Self::P384 {
                public: key.public_key().to_encoded_point(false),
                d: Zeroizing::new(key.to_bytes()),
                key,
            },
        }
    }

    fn new_p521(key: SecretKey<NistP521>) -> PrivateKey {
        PrivateKey {
            inner: Self::P521 {
                public: key.public_key().to_encoded_point(false),
                d: Zeroizing::new(key.to_bytes()),
                key,
            },
        }
    }
}

#[derive(Clone)]
enum ErasedPublicKey {
    P256 {
        key: elliptic_curve::PublicKey<NistP256>,
        point: EncodedPoint<NistP256>,
    },
    P384 {
        key: elliptic_curve::PublicKey<NistP384>,
        point: EncodedPoint<NistP384>,
    },
    P521 {
        key: elliptic_curve::PublicKey<NistP521>,
        point: EncodedPoint<NistP521>,
    },
}

impl ErasedPublicKey {
    fn new_p256(key: elliptic_curve::PublicKey<NistP256>) -> PublicKey {
        PublicKey {
            inner: Self::P256 {
                key,
                point: key.to_encoded_point(false),
            },
        }
    }

    fn new_p384(key: elliptic_curve::PublicKey<NistP384>) -> PublicKey {
        PublicKey {
            inner: Self::P384 {
                key,
                point: key.to_encoded_point(false),
            },
        }
    }

    fn new_p521(key: elliptic_curve::PublicKey<NistP521>) -> PublicKey {
        PublicKey {
            inner: Self::P521 {
                key,
                point: key.to_encoded_point(false),
            },
        }
    }
}

#[derive(Clone)]
enum ErasedSignature {
    P256(ecdsa::SignatureBytes<NistP256>),
    P384(ecdsa::SignatureBytes<NistP384>),
    P521(ecdsa::SignatureBytes<NistP521>),
}

/// The signature returned from a sign operation.
///
/// The bytes are the fixed-size `r || s` representation used by JOSE,
/// not ASN.1 DER.
pub struct Signature {
    inner: ErasedSignature,
}

impl From<Signature> for Vec<u8> {
    fn from(value: Signature) -> Self {
        value.as_ref().to_vec()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        match &self.inner {
            ErasedSignature::P256(sig) => sig.as_ref(),
            ErasedSignature::P384(sig) => sig.as_ref(),
            ErasedSignature::P521(sig) => sig.as_ref(),
        }
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_ref(), f)
    }
}

fn to_field_bytes<C: elliptic_curve::Curve>(bytes: &[u8]) -> Result<&FieldBytes<C>> {
    if bytes.len() != C::FieldBytesSize::USIZE {
        return Err(Error::InvalidLength {
            expected: C::FieldBytesSize::USIZE,
            actual: bytes.len(),
        });
    }

    Ok(FieldBytes::<C>::from_slice(bytes))
}

fn digest_message(digest: MessageDigest, msg: &[u8]) -> Vec<u8> {
    match digest {
        MessageDigest::Sha256 => Sha256::digest(msg).to_vec(),
        MessageDigest::Sha384 => Sha384::digest(msg).to_vec(),
        MessageDigest::Sha512 => Sha512::digest(msg).to_vec(),
    }
}

/// A low level private EC key.
#[derive(Clone)]
pub(crate) struct PrivateKey {
    inner: ErasedPrivateKey,
}

impl PrivateKey {
    pub(crate) fn new(
        curve: EllipticCurve,
        x: &[u8],
        y: &[u8],
        d: &SecretSlice<u8>,
    ) -> Result<Self> {
        fn new_typed<C>(x: &[u8], y: &[u8], d: &[u8]) -> Result<SecretKey<C>>
        where
            C: elliptic_curve::Curve + CurveArithmetic,
            FieldBytesSize<C>: ModulusSize,
            AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
        {
            let x = to_field_bytes::<C>(x)?;
            let y = to_field_bytes::<C>(y)?;
            let d = to_field_bytes::<C>(d)?;

            let point = EncodedPoint::<C>::from_affine_coordinates(x, y, false);
            let secret = SecretKey::<C>::from_bytes(d).map_err(Error::EllipticCurve)?;

            // binds the scalar to the supplied public point
            C::validate_public_key(&secret, &point).map_err(Error::EllipticCurve)?;

            Ok(secret)
        }

        let d = d.expose_secret();
        Ok(match curve {
            EllipticCurve::P256 => ErasedPrivateKey::new_p256(new_typed::<NistP256>(x, y, d)?),
            EllipticCurve::P384 => ErasedPrivateKey::new_p384(new_typed::<NistP384>(x, y, d)?),
            EllipticCurve::P521 => ErasedPrivateKey::new_p521(new_typed::<NistP521>(x, y, d)?),
        })
    }

    pub(crate) fn generate(curve: EllipticCurve) -> Self {
        match curve {
            EllipticCurve::P256 => ErasedPrivateKey::new_p256(SecretKey::random(&mut OsRng)),
            EllipticCurve::P384 => ErasedPrivateKey::new_p384(SecretKey::random(&mut OsRng)),
            EllipticCurve::P521 => ErasedPrivateKey::new_p521(SecretKey::random(&mut OsRng)),
        }
    }

    pub(crate) fn curve(&self) -> EllipticCurve {
        match self.inner {
            ErasedPrivateKey::P256 { .. } => EllipticCurve::P256,
            ErasedPrivateKey::P384 { .. } => EllipticCurve::P384,
            ErasedPrivateKey::P521 { .. } => EllipticCurve::P521,
        }
    }

    pub(crate) fn private_material(&self) -> &[u8] {
        match self.inner {
            ErasedPrivateKey::P256 { ref d, .. } => d.as_slice(),
            ErasedPrivateKey::P384 { ref d, .. } => d.as_slice(),
            ErasedPrivateKey::P521 { ref d, .. } => d.as_slice(),
        }
    }

    pub(crate) fn public_point(&self) -> (&[u8], &[u8]) {
        let identity_point = || &[0u8][..];

        match self.inner {
            ErasedPrivateKey::P256 { public: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
            ErasedPrivateKey::P384 { public: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
            ErasedPrivateKey::P521 { public: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
        }
    }

    pub(crate) fn to_public_key(&self) -> PublicKey {
        match self.inner {
            ErasedPrivateKey::P256 { ref key, .. } => ErasedPublicKey::new_p256(key.public_key()),
            ErasedPrivateKey::P384 { ref key, .. } => ErasedPublicKey::new_p384(key.public_key()),
            ErasedPrivateKey::P521 { ref key, .. } => ErasedPublicKey::new_p521(key.public_key()),
        }
    }

    pub(crate) fn sign(
        &self,
        digest: MessageDigest,
        msg: &[u8],
        deterministic: bool,
    ) -> Result<Signature> {
        let prehash = digest_message(digest, msg);

        let inner = match self.inner {
            ErasedPrivateKey::P256 { ref key, .. } => {
                let key = ecdsa::SigningKey::<NistP256>::from(key);

                let sig: ecdsa::Signature<NistP256> = if deterministic {
                    key.sign_prehash(&prehash).map_err(Error::Ecdsa)?
                } else {
                    key.sign_prehash_with_rng(&mut OsRng, &prehash)
                        .map_err(Error::Ecdsa)?
                };

                ErasedSignature::P256(sig.to_bytes())
            }
            ErasedPrivateKey::P384 { ref key, .. } => {
                let key = ecdsa::SigningKey::<NistP384>::from(key);

                let sig: ecdsa::Signature<NistP384> = if deterministic {
                    key.sign_prehash(&prehash).map_err(Error::Ecdsa)?
                } else {
                    key.sign_prehash_with_rng(&mut OsRng, &prehash)
                        .map_err(Error::Ecdsa)?
                };

                ErasedSignature::P384(sig.to_bytes())
            }
            ErasedPrivateKey::P521 { ref key, .. } => {
                let key = p521::ecdsa::SigningKey::from(ecdsa::SigningKey::<NistP521>::from(key));

                let sig: ecdsa::Signature<NistP521> = if deterministic {
                    key.sign_prehash(&prehash).map_err(Error::Ecdsa)?
                } else {
                    key.sign_prehash_with_rng(&mut OsRng, &prehash)
                        .map_err(Error::Ecdsa)?
                };

                ErasedSignature::P521(sig.to_bytes())
            }
        };

        Ok(Signature { inner })
    }
}

/// A low level public EC key.
#[derive(Clone)]
#[repr(transparent)]
pub(crate) struct PublicKey {
    inner: ErasedPublicKey,
}

impl PublicKey {
    pub(crate) fn new(curve: EllipticCurve, x: &[u8], y: &[u8]) -> Result<Self> {
        fn new_typed<C>(x: &[u8], y: &[u8]) -> Result<elliptic_curve::PublicKey<C>>
        where
            C: elliptic_curve::Curve + CurveArithmetic,
            FieldBytesSize<C>: ModulusSize,
            AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
        {
            let x = to_field_bytes::<C>(x)?;
            let y = to_field_bytes::<C>(y)?;

            let point = EncodedPoint::<C>::from_affine_coordinates(x, y, false);
            let key: Option<_> = elliptic_curve::PublicKey::<C>::from_encoded_point(&point).into();
            key.ok_or(Error::InvalidPoint)
        }

        Ok(match curve {
            EllipticCurve::P256 => ErasedPublicKey::new_p256(new_typed::<NistP256>(x, y)?),
            EllipticCurve::P384 => ErasedPublicKey::new_p384(new_typed::<NistP384>(x, y)?),
            EllipticCurve::P521 => ErasedPublicKey::new_p521(new_typed::<NistP521>(x, y)?),
        })
    }

    pub(crate) fn curve(&self) -> EllipticCurve {
        match self.inner {
            ErasedPublicKey::P256 { .. } => EllipticCurve::P256,
            ErasedPublicKey::P384 { .. } => EllipticCurve::P384,
            ErasedPublicKey::P521 { .. } => EllipticCurve::P521,
        }
    }

    pub(crate) fn to_point(&self) -> (&[u8], &[u8]) {
        let identity_point = || &[0u8][..];

        match self.inner {
            ErasedPublicKey::P256 { point: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
            ErasedPublicKey::P384 { point: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
            ErasedPublicKey::P521 { point: ref p, .. } => (
                p.x().map(|c| c.as_slice()).unwrap_or_else(identity_point),
                p.y().map(|c| c.as_slice()).unwrap_or_else(identity_point),
            ),
        }
    }

    pub(crate) fn verify(
        &self,
        digest: MessageDigest,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<bool> {
        let prehash = digest_message(digest, msg);

        Ok(match self.inner {
            ErasedPublicKey::P256 { ref key, .. } => {
                let Ok(sig) = ecdsa::Signature::<NistP256>::try_from(signature) else {
                    return Ok(false);
                };
                let key = ecdsa::VerifyingKey::<NistP256>::from(key);
                key.verify_prehash(&prehash, &sig).is_ok()
            }
            ErasedPublicKey::P384 { ref key, .. } => {
                let Ok(sig) = ecdsa::Signature::<NistP384>::try_from(signature) else {
                    return Ok(false);
                };
                let key = ecdsa::VerifyingKey::<NistP384>::from(key);
                key.verify_prehash(&prehash, &sig).is_ok()
            }
            ErasedPublicKey::P521 { ref key, .. } => {
                let Ok(sig) = ecdsa::Signature::<NistP521>::try_from(signature) else {
                    return Ok(false);
                };
                let key = ecdsa::VerifyingKey::<NistP521>::from(key);
                key.verify_prehash(&prehash, &sig).is_ok()
            }
        })
    }
}
