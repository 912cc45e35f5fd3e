//! Argon2id master-password key derivation for the vault
//!
//! Each stored secret has its own random salt, so every file is sealed
//! under a different key even with a single master password.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::SecureBytes;
use crate::error::{KeyCodecError, Result};

/// Salt length in bytes (256 bits)
pub const SALT_LEN: usize = 32;

/// Derived key length in bytes (256 bits for ChaCha20)
pub const KEY_LEN: usize = 32;

/// Argon2id cost parameters
///
/// The defaults (64 MB, 3 passes, 4 lanes) follow the OWASP
/// recommendation for interactive logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// A derived encryption key with its associated salt
pub struct DerivedKey {
    pub key: SecureBytes,
    pub salt: [u8; SALT_LEN],
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

/// Derive a key from `password`
///
/// With `salt == None` a fresh random salt is generated (for sealing);
/// pass the stored salt to re-derive the same key (for opening).
pub fn derive_key(
    password: &[u8],
    salt: Option<&[u8; SALT_LEN]>,
    params: &KdfParams,
) -> Result<DerivedKey> {
    let salt_bytes: [u8; SALT_LEN] = match salt {
        Some(s) => *s,
        None => {
            let mut s = [0u8; SALT_LEN];
            OsRng.fill_bytes(&mut s);
            s
        }
    };

    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| KeyCodecError::InvalidConfig(format!("Параметры Argon2: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut key_bytes = vec![0u8; KEY_LEN];
    argon2
        .hash_password_into(password, &salt_bytes, &mut key_bytes)
        .map_err(|e| KeyCodecError::EncryptionFailed(format!("Ошибка вычисления ключа: {}", e)))?;

    Ok(DerivedKey {
        key: SecureBytes::new(key_bytes),
        salt: salt_bytes,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests stay fast
    pub(crate) const TEST_PARAMS: KdfParams = KdfParams {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_derive_key_deterministic() {
        let salt = [0x42u8; SALT_LEN];
        let key1 = derive_key(b"master", Some(&salt), &TEST_PARAMS).unwrap();
        let key2 = derive_key(b"master", Some(&salt), &TEST_PARAMS).unwrap();
        assert_eq!(&*key1.key, &*key2.key);
    }

    #[test]
    fn test_random_salts_differ() {
        let key1 = derive_key(b"master", None, &TEST_PARAMS).unwrap();
        let key2 = derive_key(b"master", None, &TEST_PARAMS).unwrap();
        assert_ne!(key1.salt, key2.salt);
        assert_ne!(&*key1.key, &*key2.key);
    }

    #[test]
    fn test_invalid_params() {
        let params = KdfParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(matches!(
            derive_key(b"master", None, &params),
            Err(KeyCodecError::InvalidConfig(_))
        ));
    }
}
