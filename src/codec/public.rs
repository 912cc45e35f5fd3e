//! OpenSSH public key lines (`authorized_keys` format)
//!
//! Format: "<key type> <base64 blob> <comment>"
//!
//! Blob contents:
//! - Ed25519: string "ssh-ed25519", string key(32)
//! - ECDSA:   string "ecdsa-sha2-nistpN", string "nistpN", string Q
//!
//! Q must be an uncompressed point (0x04 || X || Y). Tools reject the
//! line if the marker byte is missing.

use std::fmt;

use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};
use sha2::{Digest, Sha256};

use super::error::CodecError;
use super::keys::{KeyTypeLabel, ParsedPrivateKey, ED25519_KEY_LEN};
use super::wire::{WireReader, WireWriter};

/// Marker byte for an uncompressed SEC1 point
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// A public key ready to be pasted into `authorized_keys`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyLine {
    label: KeyTypeLabel,
    blob: Vec<u8>,
    comment: Option<String>,
}

impl PublicKeyLine {
    /// Build a line from raw public key bytes
    ///
    /// ECDSA points may be given either with the 0x04 marker or as bare
    /// `X || Y` coordinates.
    pub fn new(label: KeyTypeLabel, public_key: &[u8], comment: &str) -> Result<Self, CodecError> {
        let public_key = normalize_public_key(label, public_key)?;
        let mut writer = WireWriter::new();
        write_public_blob(&mut writer, label, &public_key);

        Ok(Self {
            label,
            blob: writer.into_bytes(),
            comment: non_empty(comment),
        })
    }

    /// Parse one `authorized_keys` style line
    pub fn parse(line: &str) -> Result<Self, CodecError> {
        let mut parts = line.split_whitespace();
        let (Some(type_name), Some(encoded)) = (parts.next(), parts.next()) else {
            return Err(CodecError::InvalidKeyData(
                "public key line needs a type and a base64 blob".to_string(),
            ));
        };
        let comment = parts.collect::<Vec<_>>().join(" ");

        let label: KeyTypeLabel = type_name.parse()?;
        let blob = STANDARD
            .decode(encoded)
            .map_err(|_| CodecError::InvalidBase64)?;

        let mut reader = WireReader::new(&blob);
        let blob_label = reader.read_string()?;
        if blob_label != label.as_str() {
            return Err(CodecError::KeyTypeMismatch {
                public: label.as_str().to_string(),
                private: blob_label.to_string(),
            });
        }

        let public_key = match label.curve_name() {
            None => reader.read_length_prefixed()?,
            Some(curve) => {
                let blob_curve = reader.read_string()?;
                if blob_curve != curve {
                    return Err(CodecError::KeyTypeMismatch {
                        public: curve.to_string(),
                        private: blob_curve.to_string(),
                    });
                }
                reader.read_length_prefixed()?
            }
        };

        Self::new(label, public_key, &comment)
    }

    pub fn label(&self) -> KeyTypeLabel {
        self.label
    }

    /// Wire-encoded public key blob
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// `SHA256:<base64>` fingerprint, as printed by `ssh-keygen -l`
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.blob);
        format!("SHA256:{}", STANDARD_NO_PAD.encode(digest))
    }
}

impl fmt::Display for PublicKeyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, STANDARD.encode(&self.blob))?;
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

impl ParsedPrivateKey {
    /// Public half of this key as an `authorized_keys` line
    pub fn public_key_line(&self, comment: &str) -> PublicKeyLine {
        let label = self.label();
        let mut writer = WireWriter::new();
        write_public_blob(&mut writer, label, &self.public_key_bytes());

        PublicKeyLine {
            label,
            blob: writer.into_bytes(),
            comment: non_empty(comment),
        }
    }
}

/// Write the public key blob; ECDSA points must already carry the 0x04 tag
pub(crate) fn write_public_blob(writer: &mut WireWriter, label: KeyTypeLabel, public_key: &[u8]) {
    writer.write_string(label.as_str());
    if let Some(curve) = label.curve_name() {
        writer.write_string(curve);
    }
    writer.write_length_prefixed(public_key);
}

fn normalize_public_key(label: KeyTypeLabel, public_key: &[u8]) -> Result<Vec<u8>, CodecError> {
    if !label.is_ecdsa() {
        if public_key.len() != ED25519_KEY_LEN {
            return Err(CodecError::InvalidKeyData(format!(
                "Ed25519 public key must be {} bytes, got {}",
                ED25519_KEY_LEN,
                public_key.len()
            )));
        }
        return Ok(public_key.to_vec());
    }

    let coordinates = 2 * label.field_size();
    if public_key.len() == coordinates + 1 && public_key[0] == UNCOMPRESSED_POINT_TAG {
        return Ok(public_key.to_vec());
    }
    if public_key.len() == coordinates {
        let mut point = Vec::with_capacity(coordinates + 1);
        point.push(UNCOMPRESSED_POINT_TAG);
        point.extend_from_slice(public_key);
        return Ok(point);
    }

    Err(CodecError::InvalidKeyData(format!(
        "{} public key must be an uncompressed point of {} bytes, got {}",
        label,
        coordinates + 1,
        public_key.len()
    )))
}

fn non_empty(comment: &str) -> Option<String> {
    let comment = comment.trim();
    (!comment.is_empty()).then(|| comment.to_string())
}
