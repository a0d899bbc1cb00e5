//! Password-based key derivation.
//!
//! PBKDF2-HMAC-SHA256 at 100 000 iterations is the default, which is what
//! every vault written by the browser front end uses.  Argon2id is available
//! for new vaults that want a memory-hard KDF.  The parameters a vault was
//! created with are persisted next to its salt, so re-opening always uses
//! the same settings.

use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of a freshly generated salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Lowest PBKDF2 iteration count we accept.
const MIN_PBKDF2_ITERATIONS: u32 = 1_000;

/// Highest PBKDF2 iteration count we are willing to run.
const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest Argon2 memory cost in KiB (4 GiB).
const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Upper bounds on Argon2 time and lane counts.
const MAX_ARGON2_ITERATIONS: u32 = 100;
const MAX_ARGON2_PARALLELISM: u32 = 255;

/// Which KDF to run and with what cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum KdfParams {
    #[serde(rename = "pbkdf2-sha256")]
    Pbkdf2Sha256 { iterations: u32 },

    #[serde(rename = "argon2id")]
    Argon2id {
        /// Memory cost in KiB.
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Short algorithm name, as written in config and in the salt record.
    pub fn algorithm(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 { .. } => "pbkdf2-sha256",
            Self::Argon2id { .. } => "argon2id",
        }
    }

    /// Reject parameter sets that are too weak to be worth running, or so
    /// expensive that running them would exhaust memory or never finish.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                if !(MIN_PBKDF2_ITERATIONS..=MAX_PBKDF2_ITERATIONS).contains(&iterations) {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "PBKDF2 iterations must be between {MIN_PBKDF2_ITERATIONS} and \
                         {MAX_PBKDF2_ITERATIONS} (got {iterations})"
                    )));
                }
            }
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&memory_kib) {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and \
                         {MAX_MEMORY_KIB} (got {memory_kib})"
                    )));
                }
                if !(1..=MAX_ARGON2_ITERATIONS).contains(&iterations) {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "Argon2 iterations must be between 1 and {MAX_ARGON2_ITERATIONS} \
                         (got {iterations})"
                    )));
                }
                if !(1..=MAX_ARGON2_PARALLELISM).contains(&parallelism) {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "Argon2 parallelism must be between 1 and {MAX_ARGON2_PARALLELISM} \
                         (got {parallelism})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Derive a 32-byte vault key from a password and salt.
///
/// The same password + salt + params always produce the same key.
/// Empty passwords, short salts and weak parameters are
/// caller bugs and come back as `KeyDerivationFailed`.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if password.is_empty() {
        return Err(VaultError::KeyDerivationFailed("password cannot be empty".into()));
    }
    if salt.len() < SALT_LEN {
        return Err(VaultError::KeyDerivationFailed(format!(
            "salt must be at least {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    params.validate()?;

    // Derive straight into the key's own buffer so no loose copy is left.
    let mut key = DerivedKey::zeroed();

    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2_hmac::<Sha256>(password, salt, iterations, key.as_mut_bytes());
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let argon_params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
                })?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
                .hash_password_into(password, salt, key.as_mut_bytes())
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
                })?;
        }
    }

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}
