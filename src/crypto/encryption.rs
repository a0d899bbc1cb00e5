//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! nonce travels next to the ciphertext in an `EncryptedRecord`; the
//! 16-byte auth tag stays appended to the ciphertext.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// The output of one encryption: nonce plus ciphertext-with-tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` with a 32-byte `key`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<EncryptedRecord> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Never reuse a nonce under the same key.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(EncryptedRecord {
        nonce: nonce.to_vec(),
        ciphertext,
    })
}

/// Decrypt and authenticate a record produced by `encrypt`.
///
/// Every failure mode (wrong key, flipped bits, bad nonce length,
/// truncated ciphertext) returns the same `AuthenticationFailed`.
pub fn decrypt(key: &[u8], record: &EncryptedRecord) -> Result<Vec<u8>> {
    if record.nonce.len() != NONCE_LEN || record.ciphertext.len() < TAG_LEN {
        return Err(VaultError::AuthenticationFailed);
    }

    let nonce = Nonce::from_slice(&record.nonce);
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| VaultError::AuthenticationFailed)?;

    cipher
        .decrypt(nonce, record.ciphertext.as_slice())
        .map_err(|_| VaultError::AuthenticationFailed)
}
