//! RSASSA-PSS signer tests

use rsa_pss_signer::{
    Algorithm, DigestAlgorithm, Error, InvalidKey, Key, RsaPssSigner, TokenSigner,
    MINIMUM_KEY_LENGTH,
};
use static_assertions::assert_impl_all;

const PAYLOAD: &[u8] = include_bytes!("examples/payload.txt");

const RSA2048_PRIVATE_PEM: &str = include_str!("examples/rsa2048-priv.pem");
const RSA2048_PRIVATE_DER: &[u8] = include_bytes!("examples/rsa2048-priv.der");
const RSA2048_PKCS1_PRIVATE_PEM: &str = include_str!("examples/rsa2048-pkcs1-priv.pem");
const RSA2048_ENCRYPTED_PEM: &str = include_str!("examples/rsa2048-encrypted.pem");
const RSA2048_PUBLIC_PEM: &str = include_str!("examples/rsa2048-pub.pem");
const RSA2048_PUBLIC_DER: &[u8] = include_bytes!("examples/rsa2048-pub.der");
const RSA2048_PKCS1_PUBLIC_PEM: &str = include_str!("examples/rsa2048-pkcs1-pub.pem");
const RSA2048_OTHER_PUBLIC_PEM: &str = include_str!("examples/rsa2048-other-pub.pem");
const RSA4096_PRIVATE_PEM: &str = include_str!("examples/rsa4096-priv.pem");
const RSA4096_PUBLIC_PEM: &str = include_str!("examples/rsa4096-pub.pem");
const RSA8192_PRIVATE_PEM: &str = include_str!("examples/rsa8192-priv.pem");
const RSA8192_PUBLIC_PEM: &str = include_str!("examples/rsa8192-pub.pem");
const RSA_PSS_PRIVATE_PEM: &str = include_str!("examples/rsa-pss2048-priv.pem");
const RSA_PSS_PUBLIC_PEM: &str = include_str!("examples/rsa-pss2048-pub.pem");
const RSA2048_BAG_ATTRIBUTES_PEM: &str = include_str!("examples/rsa2048-bag-attributes.pem");
const RSA1024_PRIVATE_PEM: &str = include_str!("examples/rsa1024-priv.pem");
const RSA1024_PUBLIC_PEM: &str = include_str!("examples/rsa1024-pub.pem");
const EC_P256_PRIVATE_PEM: &str = include_str!("examples/ec-p256-priv.pem");
const EC_P256_PUBLIC_PEM: &str = include_str!("examples/ec-p256-pub.pem");
const ED25519_PRIVATE_PEM: &str = include_str!("examples/ed25519-priv.pem");

/// PS256 signature over `payload.txt` by the 1024-bit key, made with:
/// $ openssl dgst -sha256 -sign rsa1024-priv.pem -sigopt rsa_padding_mode:pss \
///     -sigopt rsa_pss_saltlen:digest -sigopt rsa_mgf1_md:sha256 payload.txt
const RSA1024_PS256_SIGNATURE: &[u8] = include_bytes!("examples/rsa1024-ps256.sig");

/// PS384 signature over `payload.txt` by the 2048-bit key, made with openssl.
const RSA2048_PS384_SIGNATURE: &[u8] = include_bytes!("examples/rsa2048-ps384.sig");

assert_impl_all!(RsaPssSigner: Send, Sync, Clone, TokenSigner);
assert_impl_all!(Key: Send, Sync, Clone);

fn key(pem: &str) -> Key {
    Key::plain_text(pem, None).unwrap()
}

fn invalid_key(err: Error) -> InvalidKey {
    match err {
        Error::InvalidKey(err) => err,
        other => panic!("expected InvalidKey, got {other:?}"),
    }
}

#[test]
fn round_trip_all_algorithms() {
    let private_key = key(RSA2048_PRIVATE_PEM);
    let public_key = key(RSA2048_PUBLIC_PEM);

    for alg in Algorithm::ALL {
        let signer = RsaPssSigner::new(alg);
        let signature = signer.sign(PAYLOAD, &private_key).unwrap();

        assert_eq!(signature.len(), 256);
        assert!(signer.verify(signature.as_ref(), PAYLOAD, &public_key).unwrap());
    }
}

#[test]
fn round_trip_4096() {
    let signer = RsaPssSigner::ps512();
    let signature = signer.sign(PAYLOAD, &key(RSA4096_PRIVATE_PEM)).unwrap();

    assert_eq!(signature.len(), 512);
    assert!(signer
        .verify(signature.as_ref(), PAYLOAD, &key(RSA4096_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn round_trip_8192() {
    let signer = RsaPssSigner::ps256();
    let signature = signer.sign(PAYLOAD, &key(RSA8192_PRIVATE_PEM)).unwrap();

    assert_eq!(signature.len(), 1024);
    assert!(signer
        .verify(signature.as_ref(), PAYLOAD, &key(RSA8192_PUBLIC_PEM))
        .unwrap());
    assert!(!signer
        .verify(signature.as_ref(), b"tampered", &key(RSA8192_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn rsassa_pss_keys() {
    let private_key = key(RSA_PSS_PRIVATE_PEM);
    let public_key = key(RSA_PSS_PUBLIC_PEM);

    for alg in Algorithm::ALL {
        let signer = RsaPssSigner::new(alg);
        let signature = signer.sign(PAYLOAD, &private_key).unwrap();

        assert!(signer.verify(signature.as_ref(), PAYLOAD, &public_key).unwrap());
        assert!(signer.verify(signature.as_ref(), PAYLOAD, &private_key).unwrap());
    }
}

#[test]
fn text_before_pem_armor() {
    let signer = RsaPssSigner::ps256();
    let signature = signer
        .sign(PAYLOAD, &key(RSA2048_BAG_ATTRIBUTES_PEM))
        .unwrap();

    assert!(signer
        .verify(signature.as_ref(), PAYLOAD, &key(RSA2048_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn empty_payload() {
    let signer = RsaPssSigner::ps256();
    let signature = signer.sign(b"", &key(RSA2048_PRIVATE_PEM)).unwrap();

    assert!(signer
        .verify(signature.as_ref(), b"", &key(RSA2048_PUBLIC_PEM))
        .unwrap());
    assert!(!signer
        .verify(signature.as_ref(), b"x", &key(RSA2048_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn signatures_are_randomized() {
    let signer = RsaPssSigner::ps256();
    let private_key = key(RSA2048_PRIVATE_PEM);

    let first = signer.sign(PAYLOAD, &private_key).unwrap();
    let second = signer.sign(PAYLOAD, &private_key).unwrap();
    assert_ne!(first, second);
}

#[test]
fn accepted_private_key_encodings() {
    let signer = RsaPssSigner::ps256();
    let public_key = key(RSA2048_PUBLIC_PEM);

    let keys = [
        Key::plain_text(RSA2048_PRIVATE_DER, None).unwrap(),
        key(RSA2048_PKCS1_PRIVATE_PEM),
        Key::plain_text(RSA2048_ENCRYPTED_PEM, Some("correct-horse")).unwrap(),
    ];

    for private_key in &keys {
        let signature = signer.sign(PAYLOAD, private_key).unwrap();
        assert!(signer.verify(signature.as_ref(), PAYLOAD, &public_key).unwrap());
    }
}

#[test]
fn accepted_public_key_encodings() {
    let signer = RsaPssSigner::ps256();
    let signature = signer.sign(PAYLOAD, &key(RSA2048_PRIVATE_PEM)).unwrap();

    let keys = [
        Key::plain_text(RSA2048_PUBLIC_DER, None).unwrap(),
        key(RSA2048_PKCS1_PUBLIC_PEM),
        // the public half of a private key
        key(RSA2048_PRIVATE_PEM),
        key(RSA2048_PKCS1_PRIVATE_PEM),
    ];

    for public_key in &keys {
        assert!(signer.verify(signature.as_ref(), PAYLOAD, public_key).unwrap());
    }
}

#[test]
fn openssl_interop() {
    let signer = RsaPssSigner::ps384();
    assert!(signer
        .verify(RSA2048_PS384_SIGNATURE, PAYLOAD, &key(RSA2048_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn short_key_rejected_for_signing() {
    let err = RsaPssSigner::ps256()
        .sign(PAYLOAD, &key(RSA1024_PRIVATE_PEM))
        .unwrap_err();

    assert_eq!(
        invalid_key(err),
        InvalidKey::TooShort {
            minimum: MINIMUM_KEY_LENGTH,
            actual: 1024,
        }
    );
}

#[test]
fn short_key_accepted_for_verification() {
    let signer = RsaPssSigner::ps256();

    assert!(signer
        .verify(RSA1024_PS256_SIGNATURE, PAYLOAD, &key(RSA1024_PUBLIC_PEM))
        .unwrap());
    assert!(!signer
        .verify(RSA1024_PS256_SIGNATURE, b"tampered", &key(RSA1024_PUBLIC_PEM))
        .unwrap());
}

#[test]
fn public_key_rejected_for_signing() {
    let err = RsaPssSigner::ps256()
        .sign(PAYLOAD, &key(RSA2048_PUBLIC_PEM))
        .unwrap_err();

    assert_eq!(
        invalid_key(err),
        InvalidKey::IncompatibleType {
            expected: "RSA",
            actual: "RSA public key".into(),
        }
    );
}

#[test]
fn foreign_keys_rejected() {
    let signer = RsaPssSigner::ps256();

    for (pem, family) in [(EC_P256_PRIVATE_PEM, "EC"), (ED25519_PRIVATE_PEM, "Ed25519")] {
        let err = signer.sign(PAYLOAD, &key(pem)).unwrap_err();
        assert_eq!(
            invalid_key(err),
            InvalidKey::IncompatibleType {
                expected: "RSA",
                actual: family.into(),
            }
        );
    }

    let err = signer
        .verify(&[1; 64], PAYLOAD, &key(EC_P256_PUBLIC_PEM))
        .unwrap_err();
    assert!(matches!(
        invalid_key(err),
        InvalidKey::IncompatibleType { actual, .. } if actual == "EC"
    ));
}

#[test]
fn malformed_key_is_unparsable() {
    let signer = RsaPssSigner::ps256();
    let garbage = key("this is not a key");

    assert!(matches!(
        invalid_key(signer.sign(PAYLOAD, &garbage).unwrap_err()),
        InvalidKey::Unparsable(_)
    ));
    assert!(matches!(
        invalid_key(signer.verify(&[0; 256], PAYLOAD, &garbage).unwrap_err()),
        InvalidKey::Unparsable(_)
    ));

    let truncated = key(&RSA2048_PRIVATE_PEM[..RSA2048_PRIVATE_PEM.len() / 2]);
    assert!(matches!(
        invalid_key(signer.sign(PAYLOAD, &truncated).unwrap_err()),
        InvalidKey::Unparsable(_)
    ));
}

#[test]
fn passphrase_errors_are_unparsable() {
    let signer = RsaPssSigner::ps256();

    for passphrase in [None, Some("battery-staple")] {
        let encrypted = Key::plain_text(RSA2048_ENCRYPTED_PEM, passphrase).unwrap();
        assert!(matches!(
            invalid_key(signer.sign(PAYLOAD, &encrypted).unwrap_err()),
            InvalidKey::Unparsable(_)
        ));
    }
}

#[test]
fn encrypted_key_rejected_for_verification() {
    let signer = RsaPssSigner::ps256();
    let signature = signer.sign(PAYLOAD, &key(RSA2048_PRIVATE_PEM)).unwrap();

    for passphrase in [None, Some("correct-horse")] {
        let encrypted = Key::plain_text(RSA2048_ENCRYPTED_PEM, passphrase).unwrap();
        assert!(matches!(
            invalid_key(
                signer
                    .verify(signature.as_ref(), PAYLOAD, &encrypted)
                    .unwrap_err()
            ),
            InvalidKey::Unparsable(_)
        ));
    }
}

#[test]
fn mismatched_signature_is_false() {
    let signer = RsaPssSigner::ps256();
    let signature = signer.sign(PAYLOAD, &key(RSA2048_PRIVATE_PEM)).unwrap();

    assert!(!signer
        .verify(signature.as_ref(), PAYLOAD, &key(RSA2048_OTHER_PUBLIC_PEM))
        .unwrap());
    assert!(!signer
        .verify(&signature.as_bytes()[1..], PAYLOAD, &key(RSA2048_PUBLIC_PEM))
        .unwrap());
    assert!(!signer.verify(&[], PAYLOAD, &key(RSA2048_PUBLIC_PEM)).unwrap());
}

#[test]
fn algorithms_are_separated() {
    let private_key = key(RSA2048_PRIVATE_PEM);
    let public_key = key(RSA2048_PUBLIC_PEM);

    for signing_alg in Algorithm::ALL {
        let signature = RsaPssSigner::new(signing_alg)
            .sign(PAYLOAD, &private_key)
            .unwrap();

        for verifying_alg in Algorithm::ALL {
            let valid = RsaPssSigner::new(verifying_alg)
                .verify(signature.as_ref(), PAYLOAD, &public_key)
                .unwrap();
            assert_eq!(valid, signing_alg == verifying_alg);
        }
    }
}

#[test]
fn accessors() {
    let signer = RsaPssSigner::ps384();
    assert_eq!(signer.algorithm(), DigestAlgorithm::Sha384);
    assert_eq!(signer.algorithm().as_str(), "sha384");
    assert_eq!(signer.variant(), Algorithm::Ps384);
    assert_eq!(TokenSigner::algorithm_id(&signer), "PS384");
}

#[test]
fn token_signer_object() {
    let signers: Vec<Box<dyn TokenSigner>> = Algorithm::ALL
        .into_iter()
        .map(|alg| Box::new(RsaPssSigner::new(alg)) as Box<dyn TokenSigner>)
        .collect();

    let private_key = key(RSA2048_PRIVATE_PEM);
    let public_key = key(RSA2048_PUBLIC_PEM);

    for signer in &signers {
        let signature = signer.sign(PAYLOAD, &private_key).unwrap();
        assert!(signer
            .verify(signature.as_ref(), PAYLOAD, &public_key)
            .unwrap());
    }
}

#[test]
fn concurrent_calls_share_a_key() {
    let signer = RsaPssSigner::ps256();
    let private_key = key(RSA2048_PRIVATE_PEM);
    let public_key = key(RSA2048_PUBLIC_PEM);

    std::thread::scope(|scope| {
        for i in 0..4u8 {
            let (signer, private_key, public_key) = (&signer, &private_key, &public_key);
            scope.spawn(move || {
                let payload = [i; 32];
                let signature = signer.sign(&payload, private_key).unwrap();
                assert!(signer
                    .verify(signature.as_ref(), &payload, public_key)
                    .unwrap());
            });
        }
    });
}
