//! Vault module: encrypted item storage.
//!
//! This module provides:
//! - The opaque `Item` record type (`item`)
//! - Item collection encoding (`codec`)
//! - Persisted salt and encrypted record layouts (`format`)
//! - The `Vault` lock/unlock state machine (`state`)

pub mod codec;
pub mod format;
pub mod item;
pub mod state;

// Re-export the most commonly used items.
pub use format::SaltRecord;
pub use item::Item;
pub use state::{UnlockOutcome, Vault, VaultConfig, VaultState};
