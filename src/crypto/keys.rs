//! The opaque key handle held by an unlocked vault.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::encryption::{self, EncryptedRecord};
use crate::errors::Result;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 32-byte symmetric key that can encrypt and decrypt but never be
/// read back out.
///
/// The bytes are wiped when the key is dropped.  There is no
/// accessor for the raw key, no `Clone`, and no `PartialEq`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.  Mostly useful for tests; vaults obtain their
    /// keys from `crypto::kdf::derive_key`.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// An all-zero key for the KDF to fill in place.
    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Encrypt `plaintext` under this key with a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedRecord> {
        encryption::encrypt(&self.bytes, plaintext)
    }

    /// Decrypt and authenticate a record produced by `encrypt`.
    ///
    /// The plaintext buffer is wiped when the returned value is dropped.
    pub fn decrypt(&self, record: &EncryptedRecord) -> Result<Zeroizing<Vec<u8>>> {
        encryption::decrypt(&self.bytes, record).map(Zeroizing::new)
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}
