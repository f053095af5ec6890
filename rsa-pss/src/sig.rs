//! RSASSA-PSS signature container.

use core::fmt::{self, Debug, Display, Formatter, LowerHex, UpperHex};

use signature::SignatureEncoding;

/// Raw RSASSA-PSS signature bytes.
///
/// Always non-empty. Its length equals the signing key's modulus size; any
/// transport encoding (e.g. base64url) is up to the caller.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    bytes: Box<[u8]>,
}

impl Signature {
    /// Borrow the signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Signature length in bytes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl SignatureEncoding for Signature {
    type Repr = Box<[u8]>;
}

impl TryFrom<&[u8]> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: &[u8]) -> signature::Result<Self> {
        Self::try_from(bytes.to_vec())
    }
}

impl TryFrom<Vec<u8>> for Signature {
    type Error = signature::Error;

    fn try_from(bytes: Vec<u8>) -> signature::Result<Self> {
        if bytes.is_empty() {
            return Err(signature::Error::new());
        }

        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }
}

impl From<Signature> for Box<[u8]> {
    fn from(signature: Signature) -> Box<[u8]> {
        signature.bytes
    }
}

impl From<Signature> for Vec<u8> {
    fn from(signature: Signature) -> Vec<u8> {
        signature.bytes.into_vec()
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:x})", self)
    }
}

impl LowerHex for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl UpperHex for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self)
    }
}
