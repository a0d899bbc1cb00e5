//! Cryptographic primitives for sagavault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - PBKDF2 / Argon2id password-based key derivation (`kdf`)
//! - The opaque, self-wiping `DerivedKey` handle (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt, EncryptedRecord};
pub use kdf::{derive_key, generate_salt, KdfParams};
pub use keys::DerivedKey;
