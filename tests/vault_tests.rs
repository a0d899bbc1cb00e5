//! Integration tests for the vault lifecycle.

use std::fs;
use std::io;
use std::time::Duration;

use sagavault::crypto::KdfParams;
use sagavault::storage::{FileStore, KeyValueStore, MemoryStore};
use sagavault::vault::format::{decode_salt, encode_salt, SaltRecord};
use sagavault::vault::state::{DEFAULT_DATA_KEY, DEFAULT_SALT_KEY};
use sagavault::{Item, Result, UnlockOutcome, Vault, VaultConfig, VaultError, VaultState};
use serde_json::json;
use tempfile::TempDir;

/// Cheap KDF settings so the suite stays fast.
fn fast_config() -> VaultConfig {
    VaultConfig {
        kdf: KdfParams::Pbkdf2Sha256 { iterations: 1_000 },
        ..VaultConfig::default()
    }
}

/// Helper: a fresh, absent vault over an in-memory store.
fn memory_vault() -> Vault<MemoryStore> {
    Vault::open_with_config(MemoryStore::new(), fast_config()).expect("open vault")
}

/// Helper: re-open the store behind `vault` as a new, locked instance.
fn reopen(vault: Vault<MemoryStore>) -> Vault<MemoryStore> {
    Vault::open_with_config(vault.into_store(), fast_config()).expect("reopen vault")
}

fn sample_items() -> Vec<Item> {
    vec![
        Item::new()
            .with("title", "mail")
            .with("user", "ada@example.com")
            .with("password", "hunter2"),
        Item::new()
            .with("title", "bank")
            .with("pin", 4321)
            .with("tags", json!(["money", "2fa"])),
    ]
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[test]
fn save_lock_unlock_get_roundtrip() {
    let mut vault = memory_vault();
    let items = sample_items();

    vault.create_vault(b"correct horse").unwrap();
    vault.save_items(&items).unwrap();
    vault.lock();
    assert_eq!(vault.state(), VaultState::Locked);

    assert_eq!(
        vault.unlock(b"correct horse").unwrap(),
        UnlockOutcome::Unlocked
    );
    assert_eq!(vault.get_items().unwrap(), items);
}

#[test]
fn roundtrip_survives_a_new_instance() {
    let mut vault = memory_vault();
    vault.create_vault(b"correct horse").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let mut vault = reopen(vault);
    assert_eq!(vault.state(), VaultState::Locked);
    assert!(vault.unlock(b"correct horse").unwrap().is_unlocked());
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

#[test]
fn save_replaces_the_whole_collection() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    vault.save_items(&sample_items()).unwrap();
    let only = vec![Item::new().with("title", "only")];
    vault.save_items(&only).unwrap();

    assert_eq!(vault.get_items().unwrap(), only);
}

#[test]
fn saving_same_items_twice_writes_different_records() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    vault.save_items(&sample_items()).unwrap();
    let first = vault.store().get(DEFAULT_DATA_KEY).unwrap().unwrap();
    vault.save_items(&sample_items()).unwrap();
    let second = vault.store().get(DEFAULT_DATA_KEY).unwrap().unwrap();

    assert_ne!(first, second);
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

#[test]
fn new_vault_is_empty() {
    let mut vault = memory_vault();
    vault.create_vault(b"secret").unwrap();

    assert_eq!(vault.state(), VaultState::Unlocked);
    assert!(vault.get_items().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Wrong password and tampering
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_is_rejected_and_stays_locked() {
    let mut vault = memory_vault();
    vault.create_vault(b"right-password").unwrap();
    vault.lock();

    let outcome = vault.unlock(b"wrong-password").unwrap();
    assert_eq!(outcome, UnlockOutcome::Rejected);
    assert_eq!(vault.state(), VaultState::Locked);
    assert!(matches!(vault.get_items(), Err(VaultError::VaultLocked)));

    // The right password still works afterwards.
    assert!(vault.unlock(b"right-password").unwrap().is_unlocked());
}

#[test]
fn wrong_password_while_unlocked_keeps_session() {
    let mut vault = memory_vault();
    vault.create_vault(b"right-password").unwrap();

    assert_eq!(
        vault.unlock(b"wrong-password").unwrap(),
        UnlockOutcome::Rejected
    );
    assert_eq!(vault.state(), VaultState::Unlocked);
    assert!(vault.get_items().unwrap().is_empty());
}

/// Flip one bit inside the base64 payload of a stored JSON field.
fn flip_bit_in_field(store: &mut MemoryStore, field: &str, byte: usize, bit: u8) {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let raw = store.get(DEFAULT_DATA_KEY).unwrap().unwrap();
    let mut json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    let mut bytes = BASE64.decode(json[field].as_str().unwrap()).unwrap();
    bytes[byte] ^= 1 << bit;
    json[field] = json!(BASE64.encode(&bytes));
    store
        .set(DEFAULT_DATA_KEY, &serde_json::to_vec(&json).unwrap())
        .unwrap();
}

#[test]
fn tampered_ciphertext_is_rejected() {
    let mut vault = memory_vault();
    vault.create_vault(b"tamper-pw").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let mut store = vault.into_store();
    flip_bit_in_field(&mut store, "content", 5, 3);

    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert_eq!(vault.unlock(b"tamper-pw").unwrap(), UnlockOutcome::Rejected);
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn tampered_nonce_is_rejected() {
    let mut vault = memory_vault();
    vault.create_vault(b"tamper-pw").unwrap();

    let mut store = vault.into_store();
    flip_bit_in_field(&mut store, "iv", 0, 0);

    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert_eq!(vault.unlock(b"tamper-pw").unwrap(), UnlockOutcome::Rejected);
}

#[test]
fn tampering_after_unlock_fails_get_items() {
    let dir = TempDir::new().unwrap();
    let mut vault = Vault::open_with_config(FileStore::new(dir.path()), fast_config()).unwrap();
    vault.create_vault(b"tamper-pw").unwrap();
    vault.save_items(&sample_items()).unwrap();

    // Corrupt the record behind the unlocked vault's back.
    let path = dir.path().join(DEFAULT_DATA_KEY);
    let mut json: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let content = json["content"].as_str().unwrap().to_string();
    let flipped = if content.starts_with('A') { "B" } else { "A" };
    json["content"] = json!(format!("{flipped}{}", &content[1..]));
    fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();

    assert!(matches!(
        vault.get_items(),
        Err(VaultError::AuthenticationFailed)
    ));
}

#[test]
fn unparseable_record_is_rejected_not_an_error() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    let mut store = vault.into_store();
    store.set(DEFAULT_DATA_KEY, b"{\"iv\": truncated").unwrap();

    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert_eq!(vault.unlock(b"pw").unwrap(), UnlockOutcome::Rejected);
}

// ---------------------------------------------------------------------------
// Locked-state guards
// ---------------------------------------------------------------------------

#[test]
fn items_are_guarded_before_create() {
    let mut vault = memory_vault();

    assert!(matches!(vault.get_items(), Err(VaultError::VaultLocked)));
    assert!(matches!(
        vault.save_items(&sample_items()),
        Err(VaultError::VaultLocked)
    ));

    // Nothing was written.
    assert!(vault.into_store().is_empty());
}

#[test]
fn items_are_guarded_before_unlock() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let mut vault = reopen(vault);
    assert!(matches!(vault.get_items(), Err(VaultError::VaultLocked)));
    assert!(matches!(
        vault.save_items(&[]),
        Err(VaultError::VaultLocked)
    ));

    // The guarded save did not clobber anything.
    assert!(vault.unlock(b"pw").unwrap().is_unlocked());
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

#[test]
fn lock_is_idempotent() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    vault.lock();
    assert_eq!(vault.state(), VaultState::Locked);
    vault.lock();
    assert_eq!(vault.state(), VaultState::Locked);

    // Locking an absent vault is fine too.
    let mut absent = memory_vault();
    absent.lock();
    assert_eq!(absent.state(), VaultState::Absent);
}

// ---------------------------------------------------------------------------
// Creation rules
// ---------------------------------------------------------------------------

#[test]
fn create_twice_fails_without_overwriting() {
    let mut vault = memory_vault();
    vault.create_vault(b"first").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let result = vault.create_vault(b"second");
    assert!(matches!(result, Err(VaultError::VaultAlreadyExists)));

    // A fresh instance over the same store cannot recreate it either.
    let mut vault = reopen(vault);
    assert!(matches!(
        vault.create_vault(b"second"),
        Err(VaultError::VaultAlreadyExists)
    ));

    // The original password and data are intact.
    assert_eq!(vault.unlock(b"second").unwrap(), UnlockOutcome::Rejected);
    assert!(vault.unlock(b"first").unwrap().is_unlocked());
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

#[test]
fn create_rejects_empty_password() {
    let mut vault = memory_vault();
    assert!(matches!(
        vault.create_vault(b""),
        Err(VaultError::KeyDerivationFailed(_))
    ));
    assert_eq!(vault.state(), VaultState::Absent);
}

#[test]
fn unlock_without_vault_is_not_found() {
    let mut vault = memory_vault();
    assert!(matches!(
        vault.unlock(b"pw"),
        Err(VaultError::VaultNotFound)
    ));
    assert_eq!(vault.state(), VaultState::Absent);
}

// ---------------------------------------------------------------------------
// Salt handling
// ---------------------------------------------------------------------------

#[test]
fn missing_salt_is_corrupt() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    let mut store = vault.into_store();
    store.remove(DEFAULT_SALT_KEY);

    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert!(matches!(vault.unlock(b"pw"), Err(VaultError::CorruptSalt(_))));
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn short_salt_is_corrupt() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    let mut store = vault.into_store();
    let record = SaltRecord {
        salt: vec![1, 2, 3],
        kdf: KdfParams::Pbkdf2Sha256 { iterations: 1_000 },
    };
    store
        .set(DEFAULT_SALT_KEY, &encode_salt(&record).unwrap())
        .unwrap();

    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert!(matches!(vault.unlock(b"pw"), Err(VaultError::CorruptSalt(_))));
}

/// Helper: a locked vault whose stored salt record carries `kdf`.
fn vault_with_stored_kdf(kdf: KdfParams) -> Vault<MemoryStore> {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();

    let mut store = vault.into_store();
    let mut record = decode_salt(&store.get(DEFAULT_SALT_KEY).unwrap().unwrap()).unwrap();
    record.kdf = kdf;
    store
        .set(DEFAULT_SALT_KEY, &encode_salt(&record).unwrap())
        .unwrap();

    Vault::open_with_config(store, fast_config()).unwrap()
}

#[test]
fn stored_argon2_memory_bomb_is_corrupt() {
    let mut vault = vault_with_stored_kdf(KdfParams::Argon2id {
        memory_kib: u32::MAX,
        iterations: 1,
        parallelism: 1,
    });

    assert!(matches!(vault.unlock(b"pw"), Err(VaultError::CorruptSalt(_))));
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn stored_huge_iteration_count_is_corrupt() {
    let mut vault = vault_with_stored_kdf(KdfParams::Pbkdf2Sha256 {
        iterations: u32::MAX,
    });

    assert!(matches!(vault.unlock(b"pw"), Err(VaultError::CorruptSalt(_))));
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn stored_weak_params_are_corrupt() {
    let mut vault = vault_with_stored_kdf(KdfParams::Pbkdf2Sha256 { iterations: 10 });

    assert!(matches!(vault.unlock(b"pw"), Err(VaultError::CorruptSalt(_))));
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn empty_password_is_rejected() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();
    vault.lock();

    assert_eq!(vault.unlock(b"").unwrap(), UnlockOutcome::Rejected);
    assert_eq!(vault.state(), VaultState::Locked);
}

#[test]
fn salt_is_stable_across_saves() {
    let mut vault = memory_vault();
    vault.create_vault(b"pw").unwrap();
    let before = vault.store().get(DEFAULT_SALT_KEY).unwrap();

    vault.save_items(&sample_items()).unwrap();
    vault.lock();
    assert!(vault.unlock(b"pw").unwrap().is_unlocked());

    assert_eq!(vault.store().get(DEFAULT_SALT_KEY).unwrap(), before);
}

#[test]
fn stored_kdf_wins_over_current_config() {
    let argon = VaultConfig {
        kdf: KdfParams::Argon2id {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        },
        ..VaultConfig::default()
    };
    let mut vault = Vault::open_with_config(MemoryStore::new(), argon).unwrap();
    vault.create_vault(b"pw").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let salt = decode_salt(&vault.store().get(DEFAULT_SALT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(salt.kdf.algorithm(), "argon2id");

    // Re-open with a PBKDF2 config: unlock must still use Argon2id.
    let mut vault = reopen(vault);
    assert!(vault.unlock(b"pw").unwrap().is_unlocked());
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

#[test]
fn legacy_base64_salt_with_default_kdf_unlocks() {
    // Build a record the way the browser front end did: bare base64 salt,
    // PBKDF2-SHA256 at 100 000 iterations.
    let mut vault = Vault::open(MemoryStore::new()).unwrap();
    vault.create_vault(b"legacy-pw").unwrap();
    let mut store = vault.into_store();

    let salt = decode_salt(&store.get(DEFAULT_SALT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(salt.kdf, KdfParams::default());
    let bare = {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine;
        BASE64.encode(&salt.salt)
    };
    store.set(DEFAULT_SALT_KEY, bare.as_bytes()).unwrap();

    let mut vault = Vault::open(store).unwrap();
    assert!(vault.unlock(b"legacy-pw").unwrap().is_unlocked());
    assert!(vault.get_items().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

/// A store that can be told to fail writes.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(VaultError::StoreWrite {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.set(key, value)
    }
}

#[test]
fn create_propagates_write_failure() {
    let store = FlakyStore {
        fail_writes: true,
        ..FlakyStore::default()
    };
    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();

    assert!(matches!(
        vault.create_vault(b"pw"),
        Err(VaultError::StoreWrite { .. })
    ));
    assert_eq!(vault.state(), VaultState::Absent);
    assert!(!vault.has_vault());
}

#[test]
fn save_propagates_write_failure_and_keeps_old_record() {
    let mut vault = Vault::open_with_config(FlakyStore::default(), fast_config()).unwrap();
    vault.create_vault(b"pw").unwrap();
    vault.save_items(&sample_items()).unwrap();

    let mut store = vault.into_store();
    store.fail_writes = true;
    let mut vault = Vault::open_with_config(store, fast_config()).unwrap();
    assert!(vault.unlock(b"pw").unwrap().is_unlocked());

    assert!(matches!(
        vault.save_items(&[]),
        Err(VaultError::StoreWrite { .. })
    ));
    assert_eq!(vault.state(), VaultState::Unlocked);
    assert_eq!(vault.get_items().unwrap(), sample_items());
}

// ---------------------------------------------------------------------------
// Idle timeout
// ---------------------------------------------------------------------------

#[test]
fn idle_timeout_locks_the_vault() {
    let config = VaultConfig {
        idle_timeout: Some(Duration::ZERO),
        ..fast_config()
    };
    let mut vault = Vault::open_with_config(MemoryStore::new(), config).unwrap();
    vault.create_vault(b"pw").unwrap();

    assert_eq!(vault.state(), VaultState::Locked);
    assert!(matches!(vault.get_items(), Err(VaultError::VaultLocked)));
    assert!(matches!(
        vault.save_items(&[]),
        Err(VaultError::VaultLocked)
    ));
}

#[test]
fn generous_idle_timeout_keeps_the_session() {
    let config = VaultConfig {
        idle_timeout: Some(Duration::from_secs(3_600)),
        ..fast_config()
    };
    let mut vault = Vault::open_with_config(MemoryStore::new(), config).unwrap();
    vault.create_vault(b"pw").unwrap();

    vault.save_items(&sample_items()).unwrap();
    assert_eq!(vault.get_items().unwrap(), sample_items());
    assert_eq!(vault.state(), VaultState::Unlocked);
}

// ---------------------------------------------------------------------------
// File store end to end
// ---------------------------------------------------------------------------

#[test]
fn file_backed_vault_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let store_dir = dir.path().join(".sagavault");

    let mut vault = Vault::open_with_config(FileStore::new(&store_dir), fast_config()).unwrap();
    assert_eq!(vault.state(), VaultState::Absent);
    vault.create_vault(b"file-pw").unwrap();
    vault.save_items(&sample_items()).unwrap();
    drop(vault);

    // Only the two persisted values are on disk, and neither holds plaintext.
    let mut names: Vec<_> = fs::read_dir(&store_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![DEFAULT_DATA_KEY, DEFAULT_SALT_KEY]);

    let record = fs::read_to_string(store_dir.join(DEFAULT_DATA_KEY)).unwrap();
    assert!(!record.contains("hunter2"));
    assert!(!record.contains("file-pw"));

    let mut vault = Vault::open_with_config(FileStore::new(&store_dir), fast_config()).unwrap();
    assert_eq!(vault.state(), VaultState::Locked);
    assert!(vault.unlock(b"file-pw").unwrap().is_unlocked());
    assert_eq!(vault.get_items().unwrap(), sample_items());
}
