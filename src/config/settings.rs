//! Настройки приложения (JSON)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::error::{KeyCodecError, Result};

const APP_DIR: &str = "ssh-keycodec";
const CONFIG_FILE: &str = "config.json";
const VAULT_DIR: &str = "vault";

/// Comment used for public lines and containers when none is given
pub const DEFAULT_COMMENT: &str = "ssh-keycodec";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_comment: String,
    pub vault_dir: PathBuf,
    pub kdf: KdfParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_comment: DEFAULT_COMMENT.to_string(),
            vault_dir: default_vault_dir(),
            kdf: KdfParams::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the per-user config file
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content)?;

        if settings.vault_dir.as_os_str().is_empty() {
            return Err(KeyCodecError::InvalidConfig(
                "vault_dir не может быть пустым".into(),
            ));
        }

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }
}

/// `<config dir>/ssh-keycodec/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

fn default_vault_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(VAULT_DIR)
}
