//! Item collection <-> plaintext bytes.
//!
//! The encoding is a JSON array of objects.  Object keys come out sorted,
//! so the same collection always encodes to the same bytes.

use zeroize::Zeroizing;

use super::item::Item;
use crate::errors::{Result, VaultError};

/// Encode an item collection.  The buffer is wiped on drop.
pub fn encode(items: &[Item]) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(items)
        .map(Zeroizing::new)
        .map_err(|e| VaultError::SerializationError(format!("items: {e}")))
}

/// Decode bytes produced by `encode`.
pub fn decode(bytes: &[u8]) -> Result<Vec<Item>> {
    serde_json::from_slice(bytes)
        .map_err(|e| VaultError::SerializationError(format!("items: {e}")))
}
