//! ssh-keycodec - import and re-export of SSH private keys
//!
//! This crate:
//! - Detects and decodes OpenSSH, SEC1/PKCS#8 PEM and raw Ed25519 keys
//! - Re-serializes keys as unencrypted `openssh-key-v1` containers
//! - Produces `authorized_keys` lines and fingerprints
//! - Keeps key files in a password-encrypted vault

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;

pub use codec::{import_key, parse_private_key, ParsedPrivateKey, PublicKeyLine};
pub use error::{KeyCodecError, Result};
