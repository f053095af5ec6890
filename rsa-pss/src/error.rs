//! Error types

/// Result type with the `rsa-pss-signer` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The supplied key cannot be used for the requested operation.
    #[error(transparent)]
    InvalidKey(#[from] InvalidKey),

    /// The crypto provider failed or broke its contract, e.g. by returning
    /// an empty signature. Not caused by the caller's input.
    #[error("crypto provider failure: {0}")]
    Provider(String),

    /// Key material could not be read.
    #[error("unable to read key material")]
    Io(#[from] std::io::Error),

    /// No PSS variant is registered under this name.
    #[error("unknown RSASSA-PSS algorithm `{0}`")]
    UnknownAlgorithm(String),
}

impl Error {
    /// Borrow the key validation error, if this is one.
    pub fn invalid_key(&self) -> Option<&InvalidKey> {
        match self {
            Error::InvalidKey(err) => Some(err),
            _ => None,
        }
    }
}

/// Rejection of caller-supplied key material.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidKey {
    /// The key could not be parsed: malformed or unsupported encoding,
    /// wrong or missing passphrase.
    #[error("unable to parse key: {0}")]
    Unparsable(String),

    /// The key parsed, but is not of the expected family or role.
    #[error("incompatible key type: expected {expected}, got {actual}")]
    IncompatibleType {
        /// Expected key family
        expected: &'static str,
        /// Type of the key that was provided
        actual: String,
    },

    /// The modulus is smaller than the signing minimum.
    #[error("key is too short: minimum is {minimum} bits, got {actual} bits")]
    TooShort {
        /// Minimum accepted size in bits
        minimum: usize,
        /// Size of the provided key in bits
        actual: usize,
    },

    /// Key contents were empty.
    #[error("key contents cannot be empty")]
    Empty,
}
