//! Input format sniffing

use std::fmt;

use super::openssh::MAGIC;

const OPENSSH_MARKER: &str = "BEGIN OPENSSH PRIVATE KEY";
const EC_MARKER: &str = "BEGIN EC PRIVATE KEY";
const PKCS8_MARKER: &str = "BEGIN PRIVATE KEY";
const PKCS8_ENCRYPTED_MARKER: &str = "BEGIN ENCRYPTED PRIVATE KEY";
const RSA_MARKER: &str = "BEGIN RSA PRIVATE KEY";

/// Raw Ed25519 seed, optionally followed by the public key
pub const RAW_SEED_LEN: usize = 32;
pub const RAW_KEYPAIR_LEN: usize = 64;

/// What a blob of key material looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedFormat {
    /// SEC1 `EC PRIVATE KEY` PEM
    PemEllipticCurve,
    /// PKCS#8 `PRIVATE KEY` PEM (plain or encrypted)
    PemPkcs8,
    /// `openssh-key-v1`, armored or binary
    OpenSshBinary,
    /// PKCS#1 `RSA PRIVATE KEY` PEM
    PemRsaUnsupported,
    /// 32 or 64 bytes of raw Ed25519 material
    RawFixedLength,
    Unknown,
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DetectedFormat::PemEllipticCurve => "PEM (SEC1 EC)",
            DetectedFormat::PemPkcs8 => "PEM (PKCS#8)",
            DetectedFormat::OpenSshBinary => "OpenSSH",
            DetectedFormat::PemRsaUnsupported => "PEM (PKCS#1 RSA)",
            DetectedFormat::RawFixedLength => "raw Ed25519",
            DetectedFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify `data`; the first matching rule wins
pub fn detect_format(data: &[u8]) -> DetectedFormat {
    if let Ok(text) = std::str::from_utf8(data) {
        if text.contains(OPENSSH_MARKER) {
            return DetectedFormat::OpenSshBinary;
        }
        if text.contains(EC_MARKER) {
            return DetectedFormat::PemEllipticCurve;
        }
        if text.contains(PKCS8_MARKER) || text.contains(PKCS8_ENCRYPTED_MARKER) {
            return DetectedFormat::PemPkcs8;
        }
        if text.contains(RSA_MARKER) {
            return DetectedFormat::PemRsaUnsupported;
        }
    }

    if data.starts_with(MAGIC) {
        return DetectedFormat::OpenSshBinary;
    }

    if data.len() == RAW_SEED_LEN || data.len() == RAW_KEYPAIR_LEN {
        return DetectedFormat::RawFixedLength;
    }

    DetectedFormat::Unknown
}
