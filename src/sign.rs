use thiserror::Error;

use crate::{crypto, jwa::EcDSA, jwk::FromKey};

/// This trait represents anything that can be used to sign a byte
/// payload.
///
/// To be able to be used as a [`Signer`], one must provide the sign
/// operation itself, and also needs to specify the
/// [algorithm](Signer::algorithm) the payload is hashed with.
pub trait Signer<S: AsRef<[u8]>> {
    /// Sign the given bytestring using this signer and return the
    /// signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing operation fails inside the
    /// cryptographic primitives.
    fn sign(&mut self, msg: &[u8]) -> Result<S, crypto::Error>;

    /// Return the type of signing algorithm used by this signer.
    fn algorithm(&self) -> EcDSA;
}

/// An error used if a [`Signer`] was requested from key material that has
/// no private part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("key has no private part and cannot be used for signing")]
pub struct SigningNotSupportedError;

/// A trait to turn something into a [`Signer`].
pub trait IntoSigner<T, S>
where
    T: Signer<S>,
    S: AsRef<[u8]>,
{
    /// The error returned if the conversion failed
    type Error;

    /// Turn `self` into the [`Signer`] `T`
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion failed
    fn into_signer(self, alg: EcDSA) -> Result<T, Self::Error>;
}

impl<A, T, S> IntoSigner<T, S> for A
where
    T: Signer<S> + FromKey<A>,
    S: AsRef<[u8]>,
{
    type Error = <T as FromKey<A>>::Error;

    fn into_signer(self, alg: EcDSA) -> Result<T, Self::Error> {
        T::from_key(self, alg)
    }
}
