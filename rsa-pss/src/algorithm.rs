//! RSASSA-PSS algorithm identities.

use core::{fmt, str::FromStr};

use crate::Error;

/// Hash function bound to a PSS variant.
///
/// The same function is used for the message digest and for the MGF1 mask
/// generation function, and the PSS salt is as long as its output.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum DigestAlgorithm {
    /// SHA-256
    Sha256,

    /// SHA-384
    Sha384,

    /// SHA-512
    Sha512,
}

impl DigestAlgorithm {
    /// Hash identifier, e.g. `"sha256"`.
    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest output size in bytes, which is also the PSS salt length.
    pub fn output_size(self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RSASSA-PSS algorithms as registered for JWS (RFC 7518 § 3.5).
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Algorithm {
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    Ps256,

    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    Ps384,

    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    Ps512,
}

impl Algorithm {
    /// All supported algorithms.
    pub const ALL: [Algorithm; 3] = [Algorithm::Ps256, Algorithm::Ps384, Algorithm::Ps512];

    /// JWS `alg` header value.
    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Ps256 => "PS256",
            Algorithm::Ps384 => "PS384",
            Algorithm::Ps512 => "PS512",
        }
    }

    /// Hash used for both the message digest and MGF1.
    pub fn digest(self) -> DigestAlgorithm {
        match self {
            Algorithm::Ps256 => DigestAlgorithm::Sha256,
            Algorithm::Ps384 => DigestAlgorithm::Sha384,
            Algorithm::Ps512 => DigestAlgorithm::Sha512,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.id() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.into()))
    }
}

impl From<Algorithm> for DigestAlgorithm {
    fn from(alg: Algorithm) -> DigestAlgorithm {
        alg.digest()
    }
}
