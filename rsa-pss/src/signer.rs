//! RSASSA-PSS signing and verification of token payloads.

use log::{debug, error, trace};
use rsa::traits::PublicKeyParts;

use crate::{
    Algorithm, CryptoProvider, DigestAlgorithm, Error, InvalidKey, Key, ParsedKey, Result,
    RustCryptoProvider, Signature, MINIMUM_KEY_LENGTH, RSA_FAMILY,
};

/// Signature algorithm as seen by a token building/parsing pipeline.
pub trait TokenSigner {
    /// Algorithm name placed in the token header (e.g. `"PS256"`).
    fn algorithm_id(&self) -> &'static str;

    /// Sign `payload` with `key`.
    fn sign(&self, payload: &[u8], key: &Key) -> Result<Signature>;

    /// Check `expected` against `payload` with `key`.
    ///
    /// Returns `Ok(false)` when the signature does not match.
    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> Result<bool>;
}

/// RSASSA-PSS signer for one fixed [`Algorithm`].
///
/// Stateless: keys are parsed on every call and dropped before it returns,
/// so a signer can be shared freely between threads.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPssSigner<P = RustCryptoProvider> {
    algorithm: Algorithm,
    provider: P,
}

impl RsaPssSigner {
    /// Signer for `algorithm` backed by [`RustCryptoProvider`].
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_provider(algorithm, RustCryptoProvider)
    }

    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256.
    pub fn ps256() -> Self {
        Self::new(Algorithm::Ps256)
    }

    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384.
    pub fn ps384() -> Self {
        Self::new(Algorithm::Ps384)
    }

    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512.
    pub fn ps512() -> Self {
        Self::new(Algorithm::Ps512)
    }
}

impl<P> RsaPssSigner<P> {
    /// Signer for `algorithm` backed by a custom provider.
    pub fn with_provider(algorithm: Algorithm, provider: P) -> Self {
        Self {
            algorithm,
            provider,
        }
    }

    /// Hash used for both the message digest and MGF1.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm.digest()
    }

    /// PSS variant of this signer.
    pub fn variant(&self) -> Algorithm {
        self.algorithm
    }

    /// Borrow the provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: CryptoProvider> RsaPssSigner<P> {
    /// Sign `payload` with the RSA private key in `key`.
    ///
    /// The key must be at least [`MINIMUM_KEY_LENGTH`] bits.
    pub fn sign(&self, payload: &[u8], key: &Key) -> Result<Signature> {
        let parsed = self
            .provider
            .load_private_key(key.contents(), key.passphrase())
            .map_err(|err| self.reject("sign", InvalidKey::Unparsable(err.to_string())))?;

        let private_key = match parsed {
            ParsedKey::Private(private_key) => private_key,
            other => return Err(self.reject("sign", incompatible(&other))),
        };

        let bits = private_key.n().bits();
        if bits < MINIMUM_KEY_LENGTH {
            return Err(self.reject(
                "sign",
                InvalidKey::TooShort {
                    minimum: MINIMUM_KEY_LENGTH,
                    actual: bits,
                },
            ));
        }

        let bytes = self
            .provider
            .sign(&private_key, self.algorithm(), payload)
            .map_err(|err| {
                error!("{}: provider failed to sign: {}", self.algorithm, err);
                Error::Provider(err.to_string())
            })?;

        let signature = Signature::try_from(bytes).map_err(|_| {
            error!("{}: provider returned an empty signature", self.algorithm);
            Error::Provider("provider returned an empty signature".into())
        })?;

        trace!(
            "{}: signed {}-byte payload with {}-bit key",
            self.algorithm,
            payload.len(),
            bits
        );

        Ok(signature)
    }

    /// Check `signature` over `payload` with the RSA public key in `key`.
    ///
    /// A private key is accepted and its public half is used. No minimum key
    /// size is enforced. A non-matching signature yields `Ok(false)`.
    pub fn verify(&self, signature: &[u8], payload: &[u8], key: &Key) -> Result<bool> {
        let parsed = self
            .provider
            .load_public_key(key.contents())
            .map_err(|err| self.reject("verify", InvalidKey::Unparsable(err.to_string())))?;

        let public_key = match parsed {
            ParsedKey::Public(public_key) => public_key,
            ParsedKey::Private(private_key) => private_key.to_public_key(),
            other => return Err(self.reject("verify", incompatible(&other))),
        };

        let valid = self
            .provider
            .verify(&public_key, self.algorithm(), payload, signature);

        trace!(
            "{}: verified {}-byte payload: {}",
            self.algorithm,
            payload.len(),
            valid
        );

        Ok(valid)
    }

    fn reject(&self, operation: &str, err: InvalidKey) -> Error {
        debug!("{}: key rejected for {}: {}", self.algorithm, operation, err);
        err.into()
    }
}

impl<P: CryptoProvider> TokenSigner for RsaPssSigner<P> {
    fn algorithm_id(&self) -> &'static str {
        self.algorithm.id()
    }

    fn sign(&self, payload: &[u8], key: &Key) -> Result<Signature> {
        RsaPssSigner::sign(self, payload, key)
    }

    fn verify(&self, expected: &[u8], payload: &[u8], key: &Key) -> Result<bool> {
        RsaPssSigner::verify(self, expected, payload, key)
    }
}

fn incompatible(key: &ParsedKey) -> InvalidKey {
    InvalidKey::IncompatibleType {
        expected: RSA_FAMILY,
        actual: key.type_name(),
    }
}
