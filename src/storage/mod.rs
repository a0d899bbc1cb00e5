//! Persistent store adapters.
//!
//! The vault only needs whole-value `get` / `set` on string keys.  Durability
//! and atomicity of each single write are the adapter's job; the vault never
//! keeps its own transaction log.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::errors::Result;

/// A key-value byte store the vault persists its salt and record into.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if nothing is there.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value under `key` in one atomic step.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}
