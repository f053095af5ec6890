//! Caller-supplied key material.

use core::fmt;
use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroizing;

use crate::{InvalidKey, Result};

/// Encoded key material with an optional passphrase.
///
/// A [`Key`] is never interpreted until it is handed to a signer, which parses
/// it afresh on every call. Contents and passphrase are wiped on drop.
#[derive(Clone)]
pub struct Key {
    contents: Zeroizing<Vec<u8>>,
    passphrase: Option<Zeroizing<String>>,
}

impl Key {
    /// Key from PEM text or raw DER bytes.
    pub fn plain_text(contents: impl Into<Vec<u8>>, passphrase: Option<&str>) -> Result<Self> {
        let contents = Zeroizing::new(contents.into());

        if contents.is_empty() {
            return Err(InvalidKey::Empty.into());
        }

        Ok(Self {
            contents,
            passphrase: passphrase.map(|p| Zeroizing::new(p.to_owned())),
        })
    }

    /// Key from standard base64 (e.g. DER bytes shipped through an
    /// environment variable).
    pub fn base64_encoded(encoded: &str, passphrase: Option<&str>) -> Result<Self> {
        let contents = STANDARD
            .decode(encoded.trim())
            .map_err(|err| InvalidKey::Unparsable(format!("invalid base64 key contents: {err}")))?;

        Self::plain_text(contents, passphrase)
    }

    /// Key read from a file.
    pub fn from_file(path: impl AsRef<Path>, passphrase: Option<&str>) -> Result<Self> {
        let contents = fs::read(path)?;
        Self::plain_text(contents, passphrase)
    }

    /// Encoded key material.
    ///
    /// # ⚠️ Warning
    ///
    /// This value is key material.
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Passphrase for an encrypted private key, if any.
    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_deref().map(String::as_str)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("len", &self.contents.len())
            .field("passphrase", &self.passphrase.is_some())
            .finish_non_exhaustive()
    }
}
