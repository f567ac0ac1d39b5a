use core::convert::Infallible;

use crate::{
    crypto,
    jwa::EcDSA,
    jwk::{ec::EcPublicKey, EcKey, FromKey},
    verify::Verifier,
};

/// A [`Verifier`] binding an EC public key to an ECDSA signing
/// algorithm.
#[derive(Debug, Clone)]
pub struct EcVerifier {
    key: EcPublicKey,
    algorithm: EcDSA,
}

impl EcVerifier {
    /// Creates a verifier for the given key and algorithm.
    pub fn new(key: EcPublicKey, algorithm: EcDSA) -> Self {
        Self { key, algorithm }
    }

    /// The algorithm this verifier hashes payloads with.
    pub fn algorithm(&self) -> EcDSA {
        self.algorithm
    }
}

impl Verifier for EcVerifier {
    fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<bool, crypto::Error> {
        self.key.verify(self.algorithm.digest(), msg, signature)
    }
}

impl FromKey<EcKey> for EcVerifier {
    type Error = Infallible;

    /// Turn an [`EcKey`] into a verifier.
    ///
    /// Verification only needs the public point, so this works for
    /// public and private keys alike.
    fn from_key(key: EcKey, alg: EcDSA) -> Result<Self, Self::Error> {
        Ok(Self::new(key.to_public_key(), alg))
    }
}
