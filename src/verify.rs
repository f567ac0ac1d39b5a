use crate::{crypto, jwa::EcDSA, jwk::FromKey};

/// This trait represents anything that can be used to check the
/// signature over a byte payload.
pub trait Verifier {
    /// The `verify` operation.
    ///
    /// Returns `Ok(true)` if `signature` is a valid signature over `msg`
    /// and `Ok(false)` if it is not, including signatures that do not
    /// even decode for the key's curve. A correctly shaped but wrong
    /// signature is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the cryptographic primitives fail while
    /// checking, independent of whether the signature matches.
    fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool, crypto::Error>;
}

/// A trait to turn something into a [`Verifier`].
pub trait IntoVerifier<T>
where
    T: Verifier,
{
    /// The error returned if the conversion failed
    type Error;

    /// Turn `self` into the [`Verifier`] `T`
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion failed
    fn into_verifier(self, alg: EcDSA) -> Result<T, Self::Error>;
}

impl<A, T> IntoVerifier<T> for A
where
    T: Verifier + FromKey<A>,
{
    type Error = <T as FromKey<A>>::Error;

    fn into_verifier(self, alg: EcDSA) -> Result<T, Self::Error> {
        T::from_key(self, alg)
    }
}
