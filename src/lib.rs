pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod storage;
pub mod vault;

pub use errors::{Result, VaultError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use vault::{Item, UnlockOutcome, Vault, VaultConfig, VaultState};
