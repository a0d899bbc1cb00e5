use thiserror::Error;

/// All errors that can occur in sagavault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong key, tampered bytes and truncated input all collapse into
    /// this one variant. It never says which.
    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault lifecycle errors ---
    #[error("Vault is locked or not initialized")]
    VaultLocked,

    #[error("No vault exists yet (run `sagavault init`)")]
    VaultNotFound,

    #[error("A vault already exists and will not be overwritten")]
    VaultAlreadyExists,

    #[error("Vault salt is missing or corrupted: {0}")]
    CorruptSalt(String),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Unlock refused: wrong password or corrupted vault")]
    UnlockRejected,

    #[error("Item #{0} not found")]
    ItemNotFound(usize),

    // --- Store adapter errors ---
    #[error("Failed to read '{key}' from store: {source}")]
    StoreRead {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{key}' to store: {source}")]
    StoreWrite {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid store key '{0}'")]
    InvalidStoreKey(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for sagavault results.
pub type Result<T> = std::result::Result<T, VaultError>;
