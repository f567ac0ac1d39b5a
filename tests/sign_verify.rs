//! Signing and verification through providers bound to a key and an
//! algorithm.

use jose_ec::{
    jwa::EcDSA,
    jwk::{EcKey, EcKeyError, EcPrivateKey, EcSigner, EcVerifier, EllipticCurve, RawEcJwk},
    IntoSigner as _, IntoVerifier as _, Signer as _, SigningNotSupportedError, Verifier as _,
};

const MESSAGE: &[u8] = b"GenerateASignature";

// The P-256 example key from appendix A.3 of RFC 7515.
const P256_X: &str = "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU";
const P256_Y: &str = "x_FEzRu9m36HLN_tue659LNpXW6pCyStikYjKIWI5a0";
const P256_D: &str = "jpsQnnGQmL-YBIffH1136cspYG6-0iY7X1fCE9-E9LI";

fn p256_jwk() -> RawEcJwk {
    RawEcJwk {
        crv: Some("P-256".to_string()),
        x: Some(P256_X.to_string()),
        y: Some(P256_Y.to_string()),
        d: Some(P256_D.to_string()),
    }
}

#[test]
fn round_trip_for_every_curve() {
    for (curve, alg) in [
        (EllipticCurve::P256, EcDSA::Es256),
        (EllipticCurve::P384, EcDSA::Es384),
        (EllipticCurve::P521, EcDSA::Es512),
    ] {
        let key = EcPrivateKey::generate(curve);
        let mut signer = EcSigner::new(key.clone(), alg);
        let verifier = EcVerifier::new(key.to_public_key(), alg);

        let signature = signer.sign(MESSAGE).unwrap();
        assert!(
            verifier.verify(MESSAGE, signature.as_ref()).unwrap(),
            "round trip failed on {curve}",
        );
    }
}

#[test]
fn round_trip_from_jwk_parameters() {
    let key = EcKey::from_jwk(&p256_jwk(), true).unwrap();
    let mut signer: EcSigner = key.into_signer(EcDSA::Es256).unwrap();

    // the verifying side only gets the public parameters
    let public = RawEcJwk {
        d: None,
        ..p256_jwk()
    };
    let verify_key = EcKey::from_jwk(&public, false).unwrap();
    let verifier: EcVerifier = verify_key.into_verifier(EcDSA::Es256).unwrap();

    let signature = signer.sign(MESSAGE).unwrap();
    assert!(verifier.verify(MESSAGE, signature.as_ref()).unwrap());
}

#[test]
fn verification_fails_for_a_different_key() {
    let signing_key = EcPrivateKey::generate(EllipticCurve::P256);
    let other_key = EcPrivateKey::generate(EllipticCurve::P256);

    let mut signer = EcSigner::new(signing_key, EcDSA::Es256);
    let verifier = EcVerifier::new(other_key.to_public_key(), EcDSA::Es256);

    let signature = signer.sign(MESSAGE).unwrap();
    assert!(!verifier.verify(MESSAGE, signature.as_ref()).unwrap());
}

#[test]
fn verification_fails_for_a_tampered_message() {
    let key = EcPrivateKey::generate(EllipticCurve::P384);
    let mut signer = EcSigner::new(key.clone(), EcDSA::Es384);
    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es384);

    let signature = signer.sign(MESSAGE).unwrap();
    assert!(!verifier
        .verify(b"GenerateASignature!", signature.as_ref())
        .unwrap());
}

#[test]
fn signature_from_another_curve_verifies_false() {
    let p384 = EcPrivateKey::generate(EllipticCurve::P384);
    let mut signer = EcSigner::new(p384, EcDSA::Es384);
    let signature = signer.sign(MESSAGE).unwrap();

    let p256 = EcPrivateKey::generate(EllipticCurve::P256);
    let verifier = EcVerifier::new(p256.to_public_key(), EcDSA::Es256);

    // the signature does not even decode for P-256, which is still a
    // plain `false`, not an error
    assert!(!verifier.verify(MESSAGE, signature.as_ref()).unwrap());
}

#[test]
fn garbage_signature_bytes_verify_false() {
    let key = EcPrivateKey::generate(EllipticCurve::P256);
    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es256);

    assert!(!verifier.verify(MESSAGE, &[0u8; 7]).unwrap());
    // correctly sized but r = s = 0 is rejected while decoding
    assert!(!verifier.verify(MESSAGE, &[0u8; 64]).unwrap());
}

#[test]
fn hash_width_is_not_bound_to_the_curve() {
    // ES512 with a P-256 key is unusual but permitted
    let key = EcPrivateKey::generate(EllipticCurve::P256);
    let mut signer = EcSigner::new(key.clone(), EcDSA::Es512);
    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es512);

    let signature = signer.sign(MESSAGE).unwrap();
    assert!(verifier.verify(MESSAGE, signature.as_ref()).unwrap());

    // a verifier hashing with a different width rejects the signature
    let mismatched = EcVerifier::new(key.to_public_key(), EcDSA::Es256);
    assert!(!mismatched.verify(MESSAGE, signature.as_ref()).unwrap());
}

#[test]
fn deterministic_signing_is_reproducible() {
    let key = EcPrivateKey::generate(EllipticCurve::P256);
    let mut signer = EcSigner::new(key.clone(), EcDSA::Es256).deterministic(true);

    let first = signer.sign(MESSAGE).unwrap();
    let second = signer.sign(MESSAGE).unwrap();
    assert_eq!(first.as_ref(), second.as_ref());

    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es256);
    assert!(verifier.verify(MESSAGE, first.as_ref()).unwrap());
}

#[test]
fn randomized_signatures_differ_but_both_verify() {
    let key = EcPrivateKey::generate(EllipticCurve::P256);
    let mut signer = EcSigner::new(key.clone(), EcDSA::Es256);
    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es256);

    let first = signer.sign(MESSAGE).unwrap();
    let second = signer.sign(MESSAGE).unwrap();

    assert_ne!(first.as_ref(), second.as_ref());
    assert!(verifier.verify(MESSAGE, first.as_ref()).unwrap());
    assert!(verifier.verify(MESSAGE, second.as_ref()).unwrap());
}

#[test]
fn signer_requires_a_private_key() {
    let public = RawEcJwk {
        d: None,
        ..p256_jwk()
    };
    let key = EcKey::from_jwk(&public, false).unwrap();

    let result: Result<EcSigner, _> = key.into_signer(EcDSA::Es256);
    assert_eq!(result.unwrap_err(), SigningNotSupportedError);
}

#[test]
fn verifier_from_a_private_key_uses_the_public_part() {
    let key = EcPrivateKey::generate(EllipticCurve::P521);
    let mut signer = EcSigner::new(key.clone(), EcDSA::Es512);
    let signature = signer.sign(MESSAGE).unwrap();

    let verifier: EcVerifier = EcKey::Private(key).into_verifier(EcDSA::Es512).unwrap();
    assert!(verifier.verify(MESSAGE, signature.as_ref()).unwrap());
}

#[test]
fn mismatched_private_scalar_is_a_construction_error() {
    let k1 = EcPrivateKey::generate(EllipticCurve::P256);
    let k2 = EcPrivateKey::generate(EllipticCurve::P256);

    let v1 = serde_json::to_value(&k1).unwrap();
    let v2 = serde_json::to_value(&k2).unwrap();

    let raw = RawEcJwk {
        crv: Some("P-256".to_string()),
        x: Some(v1["x"].as_str().unwrap().to_string()),
        y: Some(v1["y"].as_str().unwrap().to_string()),
        d: Some(v2["d"].as_str().unwrap().to_string()),
    };

    assert!(matches!(
        EcKey::from_jwk(&raw, true),
        Err(EcKeyError::Construction(_))
    ));
}

#[test]
fn provider_reports_its_algorithm() {
    let key = EcPrivateKey::generate(EllipticCurve::P384);
    let signer = EcSigner::new(key.clone(), EcDSA::Es384);
    assert_eq!(signer.algorithm(), EcDSA::Es384);

    let verifier = EcVerifier::new(key.to_public_key(), EcDSA::Es384);
    assert_eq!(verifier.algorithm(), EcDSA::Es384);
}
