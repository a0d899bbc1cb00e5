//! The vault lifecycle: `Absent` -> `Unlocked` <-> `Locked`.
//!
//! A `Vault` owns its store adapter and, while unlocked, the derived key.
//! Every transition is committed only after all of its fallible steps have
//! succeeded, so a failed call never leaves the vault half-unlocked or the
//! store half-written from the caller's point of view.
//!
//! Wrong passwords are an expected outcome, reported as
//! `UnlockOutcome::Rejected` rather than an error.  A tampered record looks
//! exactly the same; the two are never told apart.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::codec;
use super::format::{self, SaltRecord};
use super::item::Item;
use crate::crypto::kdf::{derive_key, generate_salt, KdfParams, SALT_LEN};
use crate::crypto::DerivedKey;
use crate::errors::{Result, VaultError};
use crate::storage::KeyValueStore;

/// Default store key for the encrypted record.
pub const DEFAULT_DATA_KEY: &str = "wsg_vault_data";

/// Default store key for the salt record.
pub const DEFAULT_SALT_KEY: &str = "wsg_vault_salt";

/// Where a vault lives in its store and how new vaults derive keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    /// Store key holding the encrypted record.
    pub data_key: String,

    /// Store key holding the salt record.
    pub salt_key: String,

    /// KDF for newly created vaults.  Existing vaults always use the
    /// parameters persisted with their salt.
    pub kdf: KdfParams,

    /// Lock automatically once a session has been idle this long.
    pub idle_timeout: Option<Duration>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            data_key: DEFAULT_DATA_KEY.to_string(),
            salt_key: DEFAULT_SALT_KEY.to_string(),
            kdf: KdfParams::default(),
            idle_timeout: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    /// No encrypted record in the store.
    Absent,
    /// A vault exists but no key is held.
    Locked,
    /// The key is held in memory.
    Unlocked,
}

/// Result of an `unlock` attempt that got as far as checking the password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum UnlockOutcome {
    Unlocked,
    /// Wrong password, or the stored record failed authentication.
    Rejected,
}

impl UnlockOutcome {
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }
}

struct Session {
    key: DerivedKey,
    last_activity: Instant,
}

impl Session {
    fn new(key: DerivedKey) -> Self {
        Self {
            key,
            last_activity: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_idle(&self, timeout: Option<Duration>) -> bool {
        timeout.is_some_and(|t| self.last_activity.elapsed() >= t)
    }
}

/// A password-protected vault over a key-value store.
///
/// Build one per vault identity with `Vault::open`; two `Vault`s over the
/// same store at the same time are not supported.
pub struct Vault<S> {
    store: S,
    config: VaultConfig,
    /// Whether the encrypted record was present last time we looked.
    exists: bool,
    session: Option<Session>,
}

impl<S: KeyValueStore> Vault<S> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open a vault with the default store keys and KDF.
    pub fn open(store: S) -> Result<Self> {
        Self::open_with_config(store, VaultConfig::default())
    }

    /// Open a vault, probing `store` for an existing encrypted record.
    ///
    /// The vault starts `Locked` if a record is found, `Absent` otherwise.
    pub fn open_with_config(store: S, config: VaultConfig) -> Result<Self> {
        let exists = store.get(&config.data_key)?.is_some();
        debug!(exists, "probed store for vault");

        Ok(Self {
            store,
            config,
            exists,
            session: None,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn has_vault(&self) -> bool {
        self.exists
    }

    pub fn state(&self) -> VaultState {
        match &self.session {
            Some(session) if !session.is_idle(self.config.idle_timeout) => VaultState::Unlocked,
            _ if self.exists => VaultState::Locked,
            _ => VaultState::Absent,
        }
    }

    /// Create a new, empty vault and leave it unlocked.
    ///
    /// Refuses with `VaultAlreadyExists` if a record is already stored;
    /// existing secrets are never overwritten.
    pub fn create_vault(&mut self, password: &[u8]) -> Result<()> {
        if self.exists || self.store.get(&self.config.data_key)?.is_some() {
            self.exists = true;
            return Err(VaultError::VaultAlreadyExists);
        }

        let salt_record = SaltRecord {
            salt: generate_salt().to_vec(),
            kdf: self.config.kdf,
        };
        let key = derive_key(password, &salt_record.salt, &salt_record.kdf)?;

        let plaintext = codec::encode(&[])?;
        let record = format::encode_record(&key.encrypt(&plaintext)?)?;
        let salt_bytes = format::encode_salt(&salt_record)?;

        // The record goes last: until it lands the vault is still absent.
        self.store.set(&self.config.salt_key, &salt_bytes)?;
        self.store.set(&self.config.data_key, &record)?;

        self.exists = true;
        self.session = Some(Session::new(key));
        info!(kdf = salt_record.kdf.algorithm(), "created new vault");
        Ok(())
    }

    /// Try to unlock with `password`.
    ///
    /// Errors are reserved for states the password cannot fix: no vault,
    /// a missing, unreadable or out-of-bounds salt record, and store failures.
    /// An empty password is simply `Rejected`.
    /// On `Rejected` the vault keeps whatever state it had before.
    pub fn unlock(&mut self, password: &[u8]) -> Result<UnlockOutcome> {
        let Some(stored) = self.store.get(&self.config.data_key)? else {
            self.exists = false;
            return Err(VaultError::VaultNotFound);
        };
        self.exists = true;

        let salt_bytes = self
            .store
            .get(&self.config.salt_key)?
            .ok_or_else(|| VaultError::CorruptSalt("salt is missing".into()))?;
        let salt_record = format::decode_salt(&salt_bytes)?;
        if salt_record.salt.len() < SALT_LEN {
            return Err(VaultError::CorruptSalt(format!(
                "salt is {} bytes, expected at least {SALT_LEN}",
                salt_record.salt.len()
            )));
        }

        // Stored parameters are untrusted input: bound them before running.
        salt_record.kdf.validate().map_err(|e| match e {
            VaultError::KeyDerivationFailed(msg) => VaultError::CorruptSalt(msg),
            other => other,
        })?;

        // No vault is ever created with an empty password.
        if password.is_empty() {
            warn!("unlock refused: empty password");
            return Ok(UnlockOutcome::Rejected);
        }

        let key = derive_key(password, &salt_record.salt, &salt_record.kdf)?;

        match open_record(&key, &stored) {
            Ok(items) => {
                self.session = Some(Session::new(key));
                info!(items = items.len(), "vault unlocked");
                Ok(UnlockOutcome::Unlocked)
            }
            Err(VaultError::AuthenticationFailed) => {
                warn!("unlock refused: authentication failed");
                Ok(UnlockOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }

    /// Drop the in-memory key.  Safe to call in any state.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            info!("vault locked");
        }
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    /// Decrypt and return the stored item collection.
    pub fn get_items(&mut self) -> Result<Vec<Item>> {
        self.expire_idle_session();
        let session = self.session.as_mut().ok_or(VaultError::VaultLocked)?;

        let stored = self
            .store
            .get(&self.config.data_key)?
            .ok_or(VaultError::VaultNotFound)?;
        let items = open_record(&session.key, &stored)?;

        session.touch();
        debug!(count = items.len(), "read vault items");
        Ok(items)
    }

    /// Encrypt `items` under a fresh nonce and replace the stored record.
    pub fn save_items(&mut self, items: &[Item]) -> Result<()> {
        self.expire_idle_session();
        let session = self.session.as_mut().ok_or(VaultError::VaultLocked)?;

        let plaintext = codec::encode(items)?;
        let record = format::encode_record(&session.key.encrypt(&plaintext)?)?;
        self.store.set(&self.config.data_key, &record)?;

        session.touch();
        debug!(count = items.len(), "saved vault items");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back.  Any held key is wiped.
    pub fn into_store(self) -> S {
        self.store
    }

    fn expire_idle_session(&mut self) {
        let idle = self
            .session
            .as_ref()
            .is_some_and(|s| s.is_idle(self.config.idle_timeout));
        if idle {
            self.session = None;
            warn!("idle timeout reached, vault locked");
        }
    }
}

/// Parse, authenticate and decode a stored record.
///
/// A record that cannot even be parsed is treated like one that fails its
/// tag check: both are `AuthenticationFailed`.
fn open_record(key: &DerivedKey, stored: &[u8]) -> Result<Vec<Item>> {
    let record = format::decode_record(stored).map_err(|_| VaultError::AuthenticationFailed)?;
    let plaintext = key.decrypt(&record)?;
    codec::decode(&plaintext)
}
