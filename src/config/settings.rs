use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EzPassError, Result};

/// User-level configuration, loaded from `~/.ezpass/config.toml`.
///
/// Every field has a sensible default so ezpass works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_kdf_memory_kib")]
    pub kdf_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,

    /// Default length for generated passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Seconds before a copied password is cleared from the clipboard
    /// (0 disables clearing).
    #[serde(default = "default_clipboard_clear_secs")]
    pub clipboard_clear_secs: u64,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

fn default_password_length() -> usize {
    16
}

fn default_clipboard_clear_secs() -> u64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf_memory_kib: default_kdf_memory_kib(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
            password_length: default_password_length(),
            clipboard_clear_secs: default_clipboard_clear_secs(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the ezpass directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Load settings from `<config_dir>/config.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            EzPassError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// The per-user ezpass directory (`~/.ezpass`).
    pub fn ezpass_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".ezpass"))
            .ok_or_else(|| EzPassError::Config("could not determine home directory".into()))
    }

    /// Default vault file location (`~/.ezpass/vault.ezp`).
    pub fn default_vault_path() -> Result<PathBuf> {
        Ok(Self::ezpass_dir()?.join("vault.ezp"))
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> crate::crypto::kdf::KdfParams {
        crate::crypto::kdf::KdfParams {
            memory_kib: self.kdf_memory_kib,
            iterations: self.kdf_iterations,
            parallelism: self.kdf_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
