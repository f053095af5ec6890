//! Key material decoding.
//!
//! Accepts PEM (RFC 7468) or raw DER holding one of:
//!
//! - PKCS#8 `PrivateKeyInfo` (`PRIVATE KEY`)
//! - PKCS#8 `EncryptedPrivateKeyInfo` (`ENCRYPTED PRIVATE KEY`), PBES2
//! - PKCS#1 `RSAPrivateKey` (`RSA PRIVATE KEY`)
//! - X.509 `SubjectPublicKeyInfo` (`PUBLIC KEY`)
//! - PKCS#1 `RSAPublicKey` (`RSA PUBLIC KEY`)
//!
//! PKCS#8 and SPKI documents are accepted with either the `rsaEncryption` or
//! the `id-RSASSA-PSS` algorithm. Documents for other key families are
//! recognised by their algorithm OID and surfaced as [`ParsedKey::Foreign`].
//! Text preceding the PEM armor (e.g. OpenSSL "Bag Attributes") is ignored.

use core::fmt;

use pkcs8::{
    der::{self, pem, Decode},
    spki::SubjectPublicKeyInfoRef,
    EncryptedPrivateKeyInfo, ObjectIdentifier, PrivateKeyInfo,
};
use rsa::{
    pkcs1::{self, DecodeRsaPrivateKey},
    traits::PublicKeyParts,
    BigUint, RsaPrivateKey, RsaPublicKey,
};
use zeroize::Zeroizing;

use crate::{MAXIMUM_KEY_LENGTH, RSA_FAMILY};

const PEM_PREFIX: &[u8] = b"-----BEGIN ";

/// `rsaEncryption`
///
/// <http://oid-info.com/get/1.2.840.113549.1.1.1>
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// `id-RSASSA-PSS`: an RSA key restricted to PSS signatures.
///
/// <http://oid-info.com/get/1.2.840.113549.1.1.10>
const RSASSA_PSS_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.10");

/// Key families recognised by OID but not usable with this signer.
const FOREIGN_FAMILIES: &[(ObjectIdentifier, &str)] = &[
    (ObjectIdentifier::new_unwrap("1.2.840.10045.2.1"), "EC"),
    (ObjectIdentifier::new_unwrap("1.2.840.10040.4.1"), "DSA"),
    (ObjectIdentifier::new_unwrap("1.3.101.110"), "X25519"),
    (ObjectIdentifier::new_unwrap("1.3.101.111"), "X448"),
    (ObjectIdentifier::new_unwrap("1.3.101.112"), "Ed25519"),
    (ObjectIdentifier::new_unwrap("1.3.101.113"), "Ed448"),
];

/// Failure to decode key material.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Invalid PEM armor.
    #[error("malformed PEM: {0}")]
    Pem(pem::Error),

    /// Invalid ASN.1 structure.
    #[error("malformed ASN.1: {0}")]
    Asn1(der::Error),

    /// PKCS#8 decryption failed.
    #[error("PKCS#8: {0}")]
    Pkcs8(pkcs8::Error),

    /// PKCS#1 private key decoding failed.
    #[error("PKCS#1: {0}")]
    Pkcs1(pkcs1::Error),

    /// Public key components were rejected.
    #[error("invalid RSA public key: {0}")]
    Rsa(rsa::Error),

    /// The modulus exceeds [`MAXIMUM_KEY_LENGTH`].
    #[error("RSA modulus of {bits} bits exceeds the supported maximum of {maximum} bits")]
    TooLarge {
        /// Size of the provided key in bits
        bits: usize,
        /// Maximum supported size in bits
        maximum: usize,
    },

    /// The private key is encrypted and no passphrase was supplied.
    #[error("encrypted private key requires a passphrase")]
    MissingPassphrase,

    /// PEM document of a type that holds no usable key.
    #[error("unsupported PEM label `{0}`")]
    UnsupportedLabel(String),

    /// DER input matched none of the supported structures.
    #[error("unrecognized key encoding")]
    UnrecognizedEncoding,
}

/// Key handle produced by a [`CryptoProvider`](crate::CryptoProvider).
///
/// Lives for a single sign or verify call.
pub enum ParsedKey {
    /// RSA private key.
    Private(RsaPrivateKey),

    /// RSA public key.
    Public(RsaPublicKey),

    /// Well-formed key of another family, named by its algorithm.
    Foreign(String),
}

impl ParsedKey {
    /// Human-readable type of this key, used in error reports.
    pub fn type_name(&self) -> String {
        match self {
            ParsedKey::Private(_) => format!("{RSA_FAMILY} private key"),
            ParsedKey::Public(_) => format!("{RSA_FAMILY} public key"),
            ParsedKey::Foreign(family) => family.clone(),
        }
    }

    /// Modulus size in bits, for RSA keys.
    pub fn bits(&self) -> Option<usize> {
        match self {
            ParsedKey::Private(key) => Some(key.n().bits()),
            ParsedKey::Public(key) => Some(key.n().bits()),
            ParsedKey::Foreign(_) => None,
        }
    }

    /// Reduce to the public role; private keys yield their public half.
    pub fn into_public(self) -> ParsedKey {
        match self {
            ParsedKey::Private(key) => ParsedKey::Public(key.to_public_key()),
            other => other,
        }
    }
}

impl fmt::Debug for ParsedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedKey")
            .field("type", &self.type_name())
            .field("bits", &self.bits())
            .finish()
    }
}

/// Decode key material, decrypting it with `passphrase` when encrypted.
pub(crate) fn load_key(contents: &[u8], passphrase: Option<&str>) -> Result<ParsedKey, ParseError> {
    let (label, der) = decode_document(contents)?;

    match label.as_deref() {
        Some("PRIVATE KEY") => decode_pkcs8(&der),
        Some("ENCRYPTED PRIVATE KEY") => decode_encrypted_pkcs8(&der, passphrase),
        Some("RSA PRIVATE KEY") => decode_pkcs1_private(&der),
        Some("PUBLIC KEY") => decode_spki(&der),
        Some("RSA PUBLIC KEY") => decode_pkcs1_public(&der),
        Some(other) => Err(ParseError::UnsupportedLabel(other.to_owned())),
        None => decode_der(&der, passphrase),
    }
}

/// Split PEM armor off, or pass DER through unchanged.
fn decode_document(contents: &[u8]) -> Result<(Option<String>, Zeroizing<Vec<u8>>), ParseError> {
    let armor = contents
        .windows(PEM_PREFIX.len())
        .position(|window| window == PEM_PREFIX);

    match armor {
        Some(start) => {
            let (label, der) =
                pem::decode_vec(contents[start..].trim_ascii_end()).map_err(ParseError::Pem)?;
            Ok((Some(label.to_owned()), Zeroizing::new(der)))
        }
        None => Ok((None, Zeroizing::new(contents.to_vec()))),
    }
}

/// Unlabelled DER: try each supported structure in turn.
fn decode_der(der: &[u8], passphrase: Option<&str>) -> Result<ParsedKey, ParseError> {
    if PrivateKeyInfo::from_der(der).is_ok() {
        return decode_pkcs8(der);
    }

    if SubjectPublicKeyInfoRef::from_der(der).is_ok() {
        return decode_spki(der);
    }

    if EncryptedPrivateKeyInfo::from_der(der).is_ok() {
        return decode_encrypted_pkcs8(der, passphrase);
    }

    if pkcs1::RsaPrivateKey::from_der(der).is_ok() {
        return decode_pkcs1_private(der);
    }

    if pkcs1::RsaPublicKey::from_der(der).is_ok() {
        return decode_pkcs1_public(der);
    }

    Err(ParseError::UnrecognizedEncoding)
}

fn is_rsa(oid: ObjectIdentifier) -> bool {
    oid == RSA_ENCRYPTION_OID || oid == RSASSA_PSS_OID
}

fn decode_pkcs8(der: &[u8]) -> Result<ParsedKey, ParseError> {
    let info = PrivateKeyInfo::from_der(der).map_err(ParseError::Asn1)?;

    if !is_rsa(info.algorithm.oid) {
        return Ok(ParsedKey::Foreign(family_name(info.algorithm.oid)));
    }

    // Both RSA algorithms wrap a PKCS#1 `RSAPrivateKey`.
    decode_pkcs1_private(info.private_key)
}

fn decode_encrypted_pkcs8(der: &[u8], passphrase: Option<&str>) -> Result<ParsedKey, ParseError> {
    let passphrase = passphrase.ok_or(ParseError::MissingPassphrase)?;
    let info = EncryptedPrivateKeyInfo::from_der(der).map_err(ParseError::Asn1)?;
    let document = info.decrypt(passphrase).map_err(ParseError::Pkcs8)?;
    decode_pkcs8(document.as_bytes())
}

fn decode_spki(der: &[u8]) -> Result<ParsedKey, ParseError> {
    let info = SubjectPublicKeyInfoRef::from_der(der).map_err(ParseError::Asn1)?;

    if !is_rsa(info.algorithm.oid) {
        return Ok(ParsedKey::Foreign(family_name(info.algorithm.oid)));
    }

    let key = info
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| ParseError::Asn1(der::Tag::BitString.value_error()))?;

    decode_pkcs1_public(key)
}

fn decode_pkcs1_private(der: &[u8]) -> Result<ParsedKey, ParseError> {
    let key = RsaPrivateKey::from_pkcs1_der(der).map_err(ParseError::Pkcs1)?;
    check_size(key.n().bits())?;
    Ok(ParsedKey::Private(key))
}

/// Build the public key from its components, so the size bound is ours
/// rather than the `rsa` crate's default of 4096 bits.
fn decode_pkcs1_public(der: &[u8]) -> Result<ParsedKey, ParseError> {
    let key = pkcs1::RsaPublicKey::from_der(der).map_err(ParseError::Asn1)?;
    let n = BigUint::from_bytes_be(key.modulus.as_bytes());
    let e = BigUint::from_bytes_be(key.public_exponent.as_bytes());

    check_size(n.bits())?;

    RsaPublicKey::new_with_max_size(n, e, MAXIMUM_KEY_LENGTH)
        .map(ParsedKey::Public)
        .map_err(ParseError::Rsa)
}

fn check_size(bits: usize) -> Result<(), ParseError> {
    if bits > MAXIMUM_KEY_LENGTH {
        return Err(ParseError::TooLarge {
            bits,
            maximum: MAXIMUM_KEY_LENGTH,
        });
    }

    Ok(())
}

fn family_name(oid: ObjectIdentifier) -> String {
    FOREIGN_FAMILIES
        .iter()
        .find(|(known, _)| *known == oid)
        .map(|(_, name)| (*name).to_owned())
        .unwrap_or_else(|| oid.to_string())
}
