//! ChaCha20-Poly1305 sealing of vault entries
//!
//! The secret's name is bound in as associated data, so an entry file
//! copied or renamed to another name fails authentication.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;

use super::SecureBytes;
use crate::error::{KeyCodecError, Result};

/// Nonce length for ChaCha20-Poly1305 (96 bits)
pub const NONCE_LEN: usize = 12;

/// Authentication tag length (128 bits)
pub const TAG_LEN: usize = 16;

/// Key length (256 bits)
pub const KEY_LEN: usize = 32;

/// Encrypt `plaintext` under `key` with a random nonce
///
/// Returns (nonce, ciphertext || tag).
pub fn seal(key: &[u8], name: &str, plaintext: &[u8]) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    if key.len() != KEY_LEN {
        return Err(KeyCodecError::EncryptionFailed(format!(
            "Неверная длина ключа: ожидалось {}, получено {}",
            KEY_LEN,
            key.len()
        )));
    }

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| KeyCodecError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: name.as_bytes(),
            },
        )
        .map_err(|e| KeyCodecError::EncryptionFailed(e.to_string()))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt and authenticate an entry sealed with [`seal`]
pub fn open(key: &[u8], name: &str, nonce: &[u8], ciphertext: &[u8]) -> Result<SecureBytes> {
    if key.len() != KEY_LEN || nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(KeyCodecError::DecryptionFailed);
    }

    let cipher =
        ChaCha20Poly1305::new_from_slice(key).map_err(|_| KeyCodecError::DecryptionFailed)?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: name.as_bytes(),
            },
        )
        .map_err(|_| KeyCodecError::DecryptionFailed)?;

    Ok(SecureBytes::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];

    #[test]
    fn test_seal_open_roundtrip() {
        let (nonce, ciphertext) = seal(&KEY, "id_ed25519", b"key bytes").unwrap();
        let plaintext = open(&KEY, "id_ed25519", &nonce, &ciphertext).unwrap();
        assert_eq!(&*plaintext, b"key bytes");
    }

    #[test]
    fn test_wrong_key_fails() {
        let (nonce, ciphertext) = seal(&KEY, "a", b"secret").unwrap();
        assert!(matches!(
            open(&[0x43; KEY_LEN], "a", &nonce, &ciphertext),
            Err(KeyCodecError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_renamed_entry_fails() {
        let (nonce, ciphertext) = seal(&KEY, "work", b"secret").unwrap();
        assert!(open(&KEY, "home", &nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (nonce, mut ciphertext) = seal(&KEY, "a", b"secret").unwrap();
        ciphertext[0] ^= 0xFF;
        assert!(open(&KEY, "a", &nonce, &ciphertext).is_err());
    }

    #[test]
    fn test_short_ciphertext_fails() {
        assert!(open(&KEY, "a", &[0u8; NONCE_LEN], &[0u8; 4]).is_err());
    }
}
