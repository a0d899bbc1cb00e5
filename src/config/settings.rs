use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_PBKDF2_ITERATIONS};
use crate::errors::{Result, VaultError};
use crate::vault::state::{VaultConfig, DEFAULT_DATA_KEY, DEFAULT_SALT_KEY};

/// Project-level configuration, loaded from `.sagavault.toml`.
///
/// Every field has a sensible default so sagavault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the store.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// KDF for new vaults: "pbkdf2-sha256" or "argon2id".
    #[serde(default = "default_kdf")]
    pub kdf: String,

    /// PBKDF2 iteration count (default: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Lock after this many idle seconds (default: never).
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,

    /// Store key for the encrypted record.
    #[serde(default = "default_data_key")]
    pub data_key: String,

    /// Store key for the salt record.
    #[serde(default = "default_salt_key")]
    pub salt_key: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".sagavault".to_string()
}

fn default_kdf() -> String {
    "pbkdf2-sha256".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_data_key() -> String {
    DEFAULT_DATA_KEY.to_string()
}

fn default_salt_key() -> String {
    DEFAULT_SALT_KEY.to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            kdf: default_kdf(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            idle_timeout_secs: None,
            data_key: default_data_key(),
            salt_key: default_salt_key(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".sagavault.toml";

    /// Load settings from `<project_dir>/.sagavault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path to the store directory.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir)
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        match self.kdf.as_str() {
            "pbkdf2-sha256" | "pbkdf2" => Ok(KdfParams::Pbkdf2Sha256 {
                iterations: self.pbkdf2_iterations,
            }),
            "argon2id" | "argon2" => Ok(KdfParams::Argon2id {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            }),
            other => Err(VaultError::ConfigError(format!(
                "unknown kdf '{other}' (use 'pbkdf2-sha256' or 'argon2id')"
            ))),
        }
    }

    /// Build the vault configuration these settings describe.
    pub fn vault_config(&self) -> Result<VaultConfig> {
        Ok(VaultConfig {
            data_key: self.data_key.clone(),
            salt_key: self.salt_key.clone(),
            kdf: self.kdf_params()?,
            idle_timeout: self.idle_timeout_secs.map(Duration::from_secs),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
