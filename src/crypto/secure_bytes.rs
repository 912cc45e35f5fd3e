//! Zeroizing container for key material and passphrases
//!
//! Bytes read from a secret store live here for the duration of one
//! import. The buffer is:
//! 1. Locked in memory where possible (kept out of swap)
//! 2. Zeroed and unlocked on drop
//! 3. Redacted in `Debug` output

use std::ops::Deref;
use zeroize::Zeroize;

pub struct SecureBytes(Vec<u8>);

impl SecureBytes {
    /// Take ownership of `data`; the vector is not copied
    pub fn new(data: Vec<u8>) -> Self {
        let secure = Self(data);
        secure.lock_memory();
        secure
    }

    #[cfg(unix)]
    fn lock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        // Best effort: fails without CAP_IPC_LOCK or over RLIMIT_MEMLOCK
        unsafe {
            libc::mlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) {}

    #[cfg(unix)]
    fn unlock_memory(&self) {
        if self.0.is_empty() {
            return;
        }
        unsafe {
            libc::munlock(self.0.as_ptr() as *const libc::c_void, self.0.len());
        }
    }

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View as UTF-8, e.g. for a stored passphrase
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
        self.unlock_memory();
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.0.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deref_and_len() {
        let secure = SecureBytes::new(vec![1, 2, 3, 4]);
        assert_eq!(secure.len(), 4);
        assert_eq!(&*secure, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(SecureBytes::from(&b"pass phrase"[..]).as_str(), Some("pass phrase"));
        assert_eq!(SecureBytes::new(vec![0xFF, 0xFE]).as_str(), None);
    }

    #[test]
    fn test_debug_redacted() {
        let secure = SecureBytes::new(b"hunter2".to_vec());
        let debug = format!("{:?}", secure);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_zeroize_clears() {
        let mut secure = SecureBytes::new(vec![9; 16]);
        secure.zeroize();
        assert!(secure.is_empty());
    }
}
