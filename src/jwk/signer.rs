use core::fmt;

use crate::{
    crypto::{self, Signature},
    jwa::EcDSA,
    jwk::{ec::EcPrivateKey, EcKey, FromKey},
    sign::{Signer, SigningNotSupportedError},
};

/// A [`Signer`] binding an EC private key to an ECDSA signing algorithm.
///
/// Signatures are randomized per invocation unless
/// [`deterministic`](Self::deterministic) signing is enabled: two
/// signatures over the same payload are not byte-identical by default.
pub struct EcSigner {
    key: EcPrivateKey,
    algorithm: EcDSA,
    deterministic: bool,
}

impl EcSigner {
    /// Creates a signer for the given key and algorithm.
    ///
    /// The algorithm selects the message digest only. It is not required
    /// to match the curve width of the key; see [`EcDSA::digest`].
    pub fn new(key: EcPrivateKey, algorithm: EcDSA) -> Self {
        Self {
            key,
            algorithm,
            deterministic: false,
        }
    }

    /// Makes the sign operation of this signer deterministic.
    ///
    /// This enables deterministic signature values, according to
    /// [RFC 6979](https://www.rfc-editor.org/rfc/rfc6979).
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }
}

impl fmt::Debug for EcSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcSigner")
            .field("key", &self.key)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Signer<Signature> for EcSigner {
    fn sign(&mut self, msg: &[u8]) -> Result<Signature, crypto::Error> {
        self.key.sign(self.algorithm.digest(), msg, self.deterministic)
    }

    fn algorithm(&self) -> EcDSA {
        self.algorithm
    }
}

impl FromKey<EcKey> for EcSigner {
    type Error = SigningNotSupportedError;

    /// Turn an [`EcKey`] into a signer.
    ///
    /// # Errors
    ///
    /// Returns [`SigningNotSupportedError`] if the key holds no private
    /// scalar.
    fn from_key(key: EcKey, alg: EcDSA) -> Result<Self, Self::Error> {
        match key {
            EcKey::Private(key) => Ok(Self::new(key, alg)),
            EcKey::Public(_) => Err(SigningNotSupportedError),
        }
    }
}
