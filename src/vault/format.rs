//! The two values a vault persists, and how they are laid out in the store.
//!
//! Salt record (cleartext, salts are not secret):
//!
//! ```text
//! {"salt":"<base64>","kdf":{"algorithm":"pbkdf2-sha256","iterations":100000}}
//! ```
//!
//! Encrypted record:
//!
//! ```text
//! {"iv":"<base64 12-byte nonce>","content":"<base64 ciphertext || 16-byte tag>"}
//! ```
//!
//! Both are UTF-8 JSON so text-only stores can hold them unchanged.  Vaults
//! written by the browser front end store the salt as a bare base64 string;
//! that form is still read, with the default KDF.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::{EncryptedRecord, KdfParams};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Salt record
// ---------------------------------------------------------------------------

/// Salt plus the KDF parameters the vault was created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltRecord {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// Missing in older records, which always used the default.
    #[serde(default)]
    pub kdf: KdfParams,
}

pub fn encode_salt(record: &SaltRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| VaultError::SerializationError(format!("salt: {e}")))
}

/// Parse a stored salt value.  Anything unreadable is a `CorruptSalt`.
pub fn decode_salt(bytes: &[u8]) -> Result<SaltRecord> {
    if let Ok(record) = serde_json::from_slice::<SaltRecord>(bytes) {
        return Ok(record);
    }

    // Legacy form: the whole value is the base64 salt.
    let text = std::str::from_utf8(bytes)
        .map_err(|_| VaultError::CorruptSalt("salt is not valid UTF-8".into()))?;
    let salt = BASE64
        .decode(text.trim())
        .map_err(|e| VaultError::CorruptSalt(format!("salt is not valid base64: {e}")))?;

    Ok(SaltRecord {
        salt,
        kdf: KdfParams::default(),
    })
}

// ---------------------------------------------------------------------------
// Encrypted record
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct StoredRecord {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    iv: Vec<u8>,
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    content: Vec<u8>,
}

pub fn encode_record(record: &EncryptedRecord) -> Result<Vec<u8>> {
    let stored = StoredRecord {
        iv: record.nonce.clone(),
        content: record.ciphertext.clone(),
    };
    serde_json::to_vec(&stored)
        .map_err(|e| VaultError::SerializationError(format!("record: {e}")))
}

pub fn decode_record(bytes: &[u8]) -> Result<EncryptedRecord> {
    let stored: StoredRecord = serde_json::from_slice(bytes)
        .map_err(|e| VaultError::InvalidVaultFormat(format!("record: {e}")))?;
    Ok(EncryptedRecord {
        nonce: stored.iv,
        ciphertext: stored.content,
    })
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
