//! Cryptographic primitives for the key vault
//!
//! This module provides:
//! - Argon2id for master-password key derivation
//! - ChaCha20-Poly1305 for sealing stored key material
//! - Secure memory handling with automatic zeroing

mod argon;
mod chacha;
mod secure_bytes;

pub use argon::{derive_key, DerivedKey, KdfParams, SALT_LEN};
pub use chacha::{open, seal, NONCE_LEN, TAG_LEN};
pub use secure_bytes::SecureBytes;

#[cfg(test)]
pub(crate) use argon::tests::TEST_PARAMS;

/// Current version of the vault entry format
pub const FORMAT_VERSION: u32 = 1;

/// Entry header:
/// [4 bytes: version][32 bytes: salt][12 bytes: nonce]
pub const HEADER_LEN: usize = 4 + SALT_LEN + NONCE_LEN;
