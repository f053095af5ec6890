#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![warn(missing_docs, rust_2018_idioms)]

mod algorithm;
mod error;
mod key;
mod parse;
mod provider;
mod sig;
mod signer;

pub use crate::{
    algorithm::{Algorithm, DigestAlgorithm},
    error::{Error, InvalidKey, Result},
    key::Key,
    parse::{ParseError, ParsedKey},
    provider::{CryptoProvider, RustCryptoProvider},
    sig::Signature,
    signer::{RsaPssSigner, TokenSigner},
};

// Re-export the crates whose types appear in the public API
pub use rsa;
pub use signature;

/// Minimum RSA modulus size, in bits, accepted for signing.
///
/// Verification does not enforce this bound.
pub const MINIMUM_KEY_LENGTH: usize = 2048;

/// Maximum RSA modulus size, in bits, accepted for signing and verification.
pub const MAXIMUM_KEY_LENGTH: usize = 16384;

/// Family name reported for RSA keys in [`InvalidKey::IncompatibleType`].
pub const RSA_FAMILY: &str = "RSA";
