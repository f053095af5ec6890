//! Asymmetric crypto provider: key parsing and the PSS primitive.

use rand_core::OsRng;
use rsa::{
    pss::{self, BlindedSigningKey, VerifyingKey},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::{
    digest::{Digest, FixedOutputReset},
    Sha256, Sha384, Sha512,
};
use signature::{RandomizedSigner, SignatureEncoding, Verifier};

use crate::{
    parse::{self, ParseError, ParsedKey},
    DigestAlgorithm,
};

/// Capability an [`RsaPssSigner`](crate::RsaPssSigner) delegates to.
///
/// Implementations parse key material and run RSASSA-PSS with the given hash
/// used for both the message digest and MGF1, with a salt as long as the
/// digest. They are trusted to be correct and constant-time where it matters.
pub trait CryptoProvider {
    /// Parse key material for signing, decrypting it with `passphrase` when
    /// it is an encrypted private key.
    fn load_private_key(
        &self,
        contents: &[u8],
        passphrase: Option<&str>,
    ) -> Result<ParsedKey, ParseError> {
        parse::load_key(contents, passphrase)
    }

    /// Parse key material for verification. Private keys are reduced to their
    /// public half.
    fn load_public_key(&self, contents: &[u8]) -> Result<ParsedKey, ParseError> {
        parse::load_key(contents, None).map(ParsedKey::into_public)
    }

    /// Produce a PSS signature over `payload`.
    fn sign(
        &self,
        key: &RsaPrivateKey,
        digest: DigestAlgorithm,
        payload: &[u8],
    ) -> signature::Result<Vec<u8>>;

    /// Check a PSS signature over `payload`.
    fn verify(
        &self,
        key: &RsaPublicKey,
        digest: DigestAlgorithm,
        payload: &[u8],
        signature: &[u8],
    ) -> bool;
}

/// Provider backed by the RustCrypto [`rsa`] crate.
///
/// Signing is blinded and randomized with the operating system RNG.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RustCryptoProvider;

impl CryptoProvider for RustCryptoProvider {
    fn sign(
        &self,
        key: &RsaPrivateKey,
        digest: DigestAlgorithm,
        payload: &[u8],
    ) -> signature::Result<Vec<u8>> {
        match digest {
            DigestAlgorithm::Sha256 => sign_pss::<Sha256>(key, payload),
            DigestAlgorithm::Sha384 => sign_pss::<Sha384>(key, payload),
            DigestAlgorithm::Sha512 => sign_pss::<Sha512>(key, payload),
        }
    }

    fn verify(
        &self,
        key: &RsaPublicKey,
        digest: DigestAlgorithm,
        payload: &[u8],
        signature: &[u8],
    ) -> bool {
        match digest {
            DigestAlgorithm::Sha256 => verify_pss::<Sha256>(key, payload, signature),
            DigestAlgorithm::Sha384 => verify_pss::<Sha384>(key, payload, signature),
            DigestAlgorithm::Sha512 => verify_pss::<Sha512>(key, payload, signature),
        }
    }
}

fn sign_pss<D>(key: &RsaPrivateKey, payload: &[u8]) -> signature::Result<Vec<u8>>
where
    D: Digest + FixedOutputReset,
{
    let signing_key = BlindedSigningKey::<D>::new(key.clone());
    let signature = signing_key.try_sign_with_rng(&mut OsRng, payload)?;
    Ok(signature.to_vec())
}

fn verify_pss<D>(key: &RsaPublicKey, payload: &[u8], signature: &[u8]) -> bool
where
    D: Digest + FixedOutputReset,
{
    let Ok(signature) = pss::Signature::try_from(signature) else {
        return false;
    };

    VerifyingKey::<D>::new(key.clone())
        .verify(payload, &signature)
        .is_ok()
}
