//! Хранилище секретов: ключи и парольные фразы
//!
//! Формат зашифрованных файлов (`<имя>.enc`):
//! [4 байта: версия (u32 BE)]
//! [32 байта: соль]
//! [12 байт: nonce]
//! [N байт: шифротекст + тег аутентификации]

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{self, ParsedPrivateKey};
use crate::crypto::{self, KdfParams, SecureBytes, FORMAT_VERSION, HEADER_LEN, SALT_LEN, TAG_LEN};
use crate::error::{KeyCodecError, Result};

const ENTRY_EXT: &str = "enc";

/// Named byte secrets: private key files and passphrases
pub trait SecretStore {
    /// Fetch a secret; `Ok(None)` if it does not exist
    fn get(&self, name: &str) -> Result<Option<SecureBytes>>;

    /// Store a secret, replacing any previous value
    fn put(&mut self, name: &str, value: &[u8]) -> Result<()>;

    /// Delete a secret; returns whether it existed
    fn remove(&mut self, name: &str) -> Result<bool>;

    /// Names of all stored secrets, sorted
    fn list(&self) -> Result<Vec<String>>;
}

/// Names map directly to file names, so they are kept to a safe alphabet
pub fn validate_secret_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(())
    } else {
        Err(KeyCodecError::InvalidSecretName(name.to_string()))
    }
}

/// Fetch a key (and optionally its passphrase) from `store` and parse it
///
/// Both secrets are dropped, and so zeroed, before this returns.
pub fn load_private_key(
    store: &dyn SecretStore,
    key_ref: &str,
    passphrase_ref: Option<&str>,
) -> Result<ParsedPrivateKey> {
    let key_bytes = store
        .get(key_ref)?
        .ok_or_else(|| KeyCodecError::SecretNotFound(key_ref.to_string()))?;

    let passphrase = match passphrase_ref {
        Some(name) => Some(
            store
                .get(name)?
                .ok_or_else(|| KeyCodecError::SecretNotFound(name.to_string()))?,
        ),
        None => None,
    };

    let passphrase_str = match &passphrase {
        Some(bytes) => Some(bytes.as_str().ok_or_else(|| {
            KeyCodecError::Other("Парольная фраза не является корректной строкой UTF-8".into())
        })?),
        None => None,
    };

    tracing::debug!(key = key_ref, with_passphrase = passphrase.is_some(), "loading key from store");
    let key = codec::parse_private_key(&key_bytes, passphrase_str)?;
    Ok(key)
}

/// In-memory store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: HashMap<String, SecureBytes>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, name: &str) -> Result<Option<SecureBytes>> {
        Ok(self.entries.get(name).map(|v| SecureBytes::from(&v[..])))
    }

    fn put(&mut self, name: &str, value: &[u8]) -> Result<()> {
        validate_secret_name(name)?;
        self.entries.insert(name.to_string(), SecureBytes::from(value));
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        Ok(self.entries.remove(name).is_some())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// One encrypted file per secret, sealed under a master password
pub struct EncryptedFileStore {
    dir: PathBuf,
    password: SecureBytes,
    kdf: KdfParams,
}

impl EncryptedFileStore {
    pub fn new(dir: impl Into<PathBuf>, password: SecureBytes, kdf: KdfParams) -> Self {
        Self {
            dir: dir.into(),
            password,
            kdf,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, ENTRY_EXT))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }
}

impl SecretStore for EncryptedFileStore {
    fn get(&self, name: &str) -> Result<Option<SecureBytes>> {
        validate_secret_name(name)?;
        let path = self.entry_path(name);

        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        if data.len() < HEADER_LEN + TAG_LEN {
            return Err(KeyCodecError::InvalidConfig(format!(
                "Файл секрета '{}' повреждён",
                name
            )));
        }

        let version = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        if version != FORMAT_VERSION {
            return Err(KeyCodecError::InvalidConfig(format!(
                "Неподдерживаемая версия файла секрета: {}",
                version
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[4..4 + SALT_LEN]);

        let nonce = &data[4 + SALT_LEN..HEADER_LEN];
        let ciphertext = &data[HEADER_LEN..];

        let derived_key = crypto::derive_key(&self.password, Some(&salt), &self.kdf)?;
        let plaintext = crypto::open(&derived_key.key, name, nonce, ciphertext)?;

        Ok(Some(plaintext))
    }

    fn put(&mut self, name: &str, value: &[u8]) -> Result<()> {
        validate_secret_name(name)?;
        self.ensure_dir()?;

        let derived_key = crypto::derive_key(&self.password, None, &self.kdf)?;
        let (nonce, ciphertext) = crypto::seal(&derived_key.key, name, value)?;

        let mut data = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        data.extend_from_slice(&FORMAT_VERSION.to_be_bytes());
        data.extend_from_slice(&derived_key.salt);
        data.extend_from_slice(&nonce);
        data.extend_from_slice(&ciphertext);

        let path = self.entry_path(name);
        write_private_file(&path, &data)?;

        tracing::debug!(name, path = %path.display(), "stored secret");
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<bool> {
        validate_secret_name(name)?;
        let path = self.entry_path(name);

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        Ok(true)
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_secret_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Write `data` to `path`, readable by the owner only
pub fn write_private_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
