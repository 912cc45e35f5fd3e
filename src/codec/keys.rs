//! Per-curve private key decoding and encoding
//!
//! Supported key types:
//! - Ed25519 (`ssh-ed25519`)
//! - ECDSA over NIST P-256, P-384 and P-521 (`ecdsa-sha2-nistp*`)
//!
//! The OpenSSH private section layouts handled here, after the key type
//! string has already been consumed:
//!
//! ```text
//! ssh-ed25519:        string pub(32)  string seed(32)||pub(32)
//! ecdsa-sha2-nistpN:  string curve    string Q (0x04||X||Y)  mpint d
//! ```

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::SigningKey;
use p256::elliptic_curve::{
    sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint},
    AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey, SecretKey,
};
use zeroize::{Zeroize, Zeroizing};

use super::detect::{RAW_KEYPAIR_LEN, RAW_SEED_LEN};
use super::error::CodecError;
use super::wire::{WireReader, WireWriter};

/// Ed25519 public key / seed length
pub const ED25519_KEY_LEN: usize = 32;

/// SSH key type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTypeLabel {
    Ed25519,
    EcdsaP256,
    EcdsaP384,
    EcdsaP521,
}

impl KeyTypeLabel {
    pub const ALL: [KeyTypeLabel; 4] = [
        KeyTypeLabel::Ed25519,
        KeyTypeLabel::EcdsaP256,
        KeyTypeLabel::EcdsaP384,
        KeyTypeLabel::EcdsaP521,
    ];

    /// Name as registered for the SSH protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyTypeLabel::Ed25519 => "ssh-ed25519",
            KeyTypeLabel::EcdsaP256 => "ecdsa-sha2-nistp256",
            KeyTypeLabel::EcdsaP384 => "ecdsa-sha2-nistp384",
            KeyTypeLabel::EcdsaP521 => "ecdsa-sha2-nistp521",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == name)
    }

    /// Curve identifier carried inside ECDSA blobs
    pub fn curve_name(&self) -> Option<&'static str> {
        match self {
            KeyTypeLabel::Ed25519 => None,
            KeyTypeLabel::EcdsaP256 => Some("nistp256"),
            KeyTypeLabel::EcdsaP384 => Some("nistp384"),
            KeyTypeLabel::EcdsaP521 => Some("nistp521"),
        }
    }

    /// Size in bytes of one field element (and of the private scalar)
    pub fn field_size(&self) -> usize {
        match self {
            KeyTypeLabel::Ed25519 => ED25519_KEY_LEN,
            KeyTypeLabel::EcdsaP256 => 32,
            KeyTypeLabel::EcdsaP384 => 48,
            KeyTypeLabel::EcdsaP521 => 66,
        }
    }

    pub fn is_ecdsa(&self) -> bool {
        self.curve_name().is_some()
    }
}

impl fmt::Display for KeyTypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyTypeLabel {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| CodecError::UnsupportedKeyType(s.to_string()))
    }
}

/// A successfully imported private key
///
/// Each variant owns the curve-specific secret; the public half is
/// always derived from it. All variants zeroize their secret on drop.
#[derive(Clone)]
pub enum ParsedPrivateKey {
    Ed25519(SigningKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl ParsedPrivateKey {
    pub fn label(&self) -> KeyTypeLabel {
        match self {
            ParsedPrivateKey::Ed25519(_) => KeyTypeLabel::Ed25519,
            ParsedPrivateKey::P256(_) => KeyTypeLabel::EcdsaP256,
            ParsedPrivateKey::P384(_) => KeyTypeLabel::EcdsaP384,
            ParsedPrivateKey::P521(_) => KeyTypeLabel::EcdsaP521,
        }
    }

    /// Public key bytes: 32 bytes for Ed25519, an uncompressed SEC1 point
    /// (`0x04 || X || Y`) for ECDSA
    pub fn public_key_bytes(&self) -> Vec<u8> {
        match self {
            ParsedPrivateKey::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            ParsedPrivateKey::P256(key) => uncompressed_point(key),
            ParsedPrivateKey::P384(key) => uncompressed_point(key),
            ParsedPrivateKey::P521(key) => uncompressed_point(key),
        }
    }

    /// Raw private scalar, or the 32-byte seed for Ed25519
    pub fn private_key_bytes(&self) -> Zeroizing<Vec<u8>> {
        match self {
            ParsedPrivateKey::Ed25519(key) => Zeroizing::new(key.to_bytes().to_vec()),
            ParsedPrivateKey::P256(key) => Zeroizing::new(key.to_bytes().to_vec()),
            ParsedPrivateKey::P384(key) => Zeroizing::new(key.to_bytes().to_vec()),
            ParsedPrivateKey::P521(key) => Zeroizing::new(key.to_bytes().to_vec()),
        }
    }
}

// Never print key material
impl fmt::Debug for ParsedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedPrivateKey")
            .field("type", &self.label().as_str())
            .field("private", &"[REDACTED]")
            .finish()
    }
}

fn uncompressed_point<C>(key: &SecretKey<C>) -> Vec<u8>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    key.public_key().to_encoded_point(false).as_bytes().to_vec()
}

/// Decode the private key body that follows `label` in a wire buffer
pub fn decode(
    label: KeyTypeLabel,
    reader: &mut WireReader<'_>,
) -> Result<ParsedPrivateKey, CodecError> {
    match label {
        KeyTypeLabel::Ed25519 => decode_ed25519(reader),
        KeyTypeLabel::EcdsaP256 => {
            let (point, scalar) = read_ecdsa_fields(label, reader)?;
            ecdsa_secret::<p256::NistP256>(label, point, scalar).map(ParsedPrivateKey::P256)
        }
        KeyTypeLabel::EcdsaP384 => {
            let (point, scalar) = read_ecdsa_fields(label, reader)?;
            ecdsa_secret::<p384::NistP384>(label, point, scalar).map(ParsedPrivateKey::P384)
        }
        KeyTypeLabel::EcdsaP521 => {
            let (point, scalar) = read_ecdsa_fields(label, reader)?;
            ecdsa_secret::<p521::NistP521>(label, point, scalar).map(ParsedPrivateKey::P521)
        }
    }
}

/// Write the private key body; the key type string is the caller's job
pub fn encode(key: &ParsedPrivateKey, writer: &mut WireWriter) {
    match key {
        ParsedPrivateKey::Ed25519(signing_key) => {
            let public = signing_key.verifying_key().to_bytes();
            writer.write_length_prefixed(&public);
            writer.write_composite(|inner| {
                inner.write_raw(signing_key.as_bytes());
                inner.write_raw(&public);
            });
        }
        ecdsa => {
            let label = ecdsa.label();
            writer.write_string(label.curve_name().unwrap_or_default());
            writer.write_length_prefixed(&ecdsa.public_key_bytes());
            writer.write_mpint(&ecdsa.private_key_bytes());
        }
    }
}

/// Build an Ed25519 key from 32 raw seed bytes, or 64 bytes of
/// seed followed by the public key
pub fn decode_raw_ed25519(data: &[u8]) -> Result<ParsedPrivateKey, CodecError> {
    if data.len() != RAW_SEED_LEN && data.len() != RAW_KEYPAIR_LEN {
        return Err(CodecError::InvalidKeyData(format!(
            "raw Ed25519 key must be {} or {} bytes, got {}",
            RAW_SEED_LEN,
            RAW_KEYPAIR_LEN,
            data.len()
        )));
    }

    let signing_key = signing_key_from_seed(&data[..RAW_SEED_LEN]);
    if data.len() == RAW_KEYPAIR_LEN {
        check_ed25519_public(&signing_key, &data[RAW_SEED_LEN..]);
    }

    Ok(ParsedPrivateKey::Ed25519(signing_key))
}

fn decode_ed25519(reader: &mut WireReader<'_>) -> Result<ParsedPrivateKey, CodecError> {
    let public = reader.read_length_prefixed()?;
    if public.len() != ED25519_KEY_LEN {
        return Err(CodecError::InvalidKeyData(format!(
            "Ed25519 public key must be {} bytes, got {}",
            ED25519_KEY_LEN,
            public.len()
        )));
    }

    let private = reader.read_length_prefixed()?;
    if private.len() != 2 * ED25519_KEY_LEN {
        return Err(CodecError::InvalidKeyData(format!(
            "Ed25519 private key must be {} bytes, got {}",
            2 * ED25519_KEY_LEN,
            private.len()
        )));
    }

    let signing_key = signing_key_from_seed(&private[..ED25519_KEY_LEN]);
    check_ed25519_public(&signing_key, public);
    check_ed25519_public(&signing_key, &private[ED25519_KEY_LEN..]);

    Ok(ParsedPrivateKey::Ed25519(signing_key))
}

fn signing_key_from_seed(seed: &[u8]) -> SigningKey {
    let mut bytes = [0u8; ED25519_KEY_LEN];
    bytes.copy_from_slice(seed);
    let signing_key = SigningKey::from_bytes(&bytes);
    bytes.zeroize();
    signing_key
}

// The seed alone determines the key pair, so a stale or garbled copy of
// the public key is reported and otherwise ignored.
fn check_ed25519_public(signing_key: &SigningKey, stored: &[u8]) {
    if signing_key.verifying_key().as_bytes()[..] != *stored {
        tracing::warn!("stored Ed25519 public key does not match the private seed, using the derived one");
    }
}

fn read_ecdsa_fields<'a>(
    label: KeyTypeLabel,
    reader: &mut WireReader<'a>,
) -> Result<(&'a [u8], &'a [u8]), CodecError> {
    let expected = label.curve_name().unwrap_or_default();
    let curve = reader.read_string()?;
    if curve != expected {
        return Err(CodecError::KeyTypeMismatch {
            public: expected.to_string(),
            private: curve.to_string(),
        });
    }

    let point = reader.read_length_prefixed()?;
    let scalar = reader.read_mpint()?;
    Ok((point, scalar))
}

fn ecdsa_secret<C>(
    label: KeyTypeLabel,
    point: &[u8],
    scalar: &[u8],
) -> Result<SecretKey<C>, CodecError>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let size = label.field_size();
    if scalar.is_empty() || scalar.len() > size {
        return Err(CodecError::InvalidKeyData(format!(
            "{} private scalar must be at most {} bytes, got {}",
            label,
            size,
            scalar.len()
        )));
    }

    let mut padded = Zeroizing::new(vec![0u8; size]);
    padded[size - scalar.len()..].copy_from_slice(scalar);

    let secret = SecretKey::<C>::from_slice(&padded)
        .map_err(|_| CodecError::ParsingFailed(format!("{label} private scalar is out of range")))?;

    let stored = PublicKey::<C>::from_sec1_bytes(point)
        .map_err(|_| CodecError::ParsingFailed(format!("{label} public point is invalid")))?;

    if stored.to_encoded_point(false) != secret.public_key().to_encoded_point(false) {
        tracing::warn!(key_type = %label, "stored ECDSA public point does not match the private scalar, using the derived one");
    }

    Ok(secret)
}
