//! Configuration and secret storage for ssh-keycodec
//!
//! Handles:
//! - The JSON settings file
//! - Named secrets (key files, passphrases), in memory or encrypted on disk

mod settings;
mod storage;

pub use settings::{default_config_path, Settings, DEFAULT_COMMENT};
pub use storage::{
    load_private_key, validate_secret_name, write_private_file, EncryptedFileStore,
    MemorySecretStore, SecretStore,
};
