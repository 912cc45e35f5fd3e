//! SEC1 and PKCS#8 PEM private keys
//!
//! ASN.1 decoding is left to the RustCrypto curve crates; this module
//! only cuts the PEM block out of the input and tries each curve.

use p256::pkcs8::DecodePrivateKey;

use super::detect::DetectedFormat;
use super::error::CodecError;
use super::keys::ParsedPrivateKey;

const PEM_BEGIN: &str = "-----BEGIN ";
const PEM_END: &str = "-----END ";

/// Markers of a passphrase-protected PEM file
const ENCRYPTED_MARKERS: &[&str] = &["BEGIN ENCRYPTED PRIVATE KEY", "Proc-Type: 4,ENCRYPTED"];

/// Decode a PEM key detected as `format`
///
/// Curves are tried in the order P-256, P-384, P-521; PKCS#8 input is
/// also tried as Ed25519. The first decoder that accepts the block wins.
pub fn parse_pem(
    text: &str,
    format: DetectedFormat,
    passphrase: Option<&str>,
) -> Result<ParsedPrivateKey, CodecError> {
    if passphrase.is_some() {
        return Err(CodecError::EncryptedPemNotSupported);
    }
    if ENCRYPTED_MARKERS.iter().any(|marker| text.contains(marker)) {
        return Err(CodecError::PassphraseRequired);
    }

    let block = pem_block(text).ok_or(CodecError::InvalidArmor)?;
    let key = match format {
        DetectedFormat::PemEllipticCurve => decode_sec1(block),
        _ => decode_pkcs8(block),
    };

    key.ok_or(CodecError::UnableToParsePem)
}

fn decode_sec1(block: &str) -> Option<ParsedPrivateKey> {
    if let Ok(key) = p256::SecretKey::from_sec1_pem(block) {
        return Some(ParsedPrivateKey::P256(key));
    }
    if let Ok(key) = p384::SecretKey::from_sec1_pem(block) {
        return Some(ParsedPrivateKey::P384(key));
    }
    if let Ok(key) = p521::SecretKey::from_sec1_pem(block) {
        return Some(ParsedPrivateKey::P521(key));
    }
    None
}

fn decode_pkcs8(block: &str) -> Option<ParsedPrivateKey> {
    if let Ok(key) = p256::SecretKey::from_pkcs8_pem(block) {
        return Some(ParsedPrivateKey::P256(key));
    }
    if let Ok(key) = p384::SecretKey::from_pkcs8_pem(block) {
        return Some(ParsedPrivateKey::P384(key));
    }
    if let Ok(key) = p521::SecretKey::from_pkcs8_pem(block) {
        return Some(ParsedPrivateKey::P521(key));
    }
    if let Ok(key) = ed25519_dalek::SigningKey::from_pkcs8_pem(block) {
        return Some(ParsedPrivateKey::Ed25519(key));
    }
    None
}

/// First `-----BEGIN ...` through the matching `-----END ...-----` line
fn pem_block(text: &str) -> Option<&str> {
    let start = text.find(PEM_BEGIN)?;
    let after = &text[start..];
    let end = after.find(PEM_END)?;
    let footer = &after[end..];
    let footer_len = footer[PEM_END.len()..]
        .find("-----")
        .map(|pos| PEM_END.len() + pos + "-----".len())?;
    Some(&after[..end + footer_len])
}
