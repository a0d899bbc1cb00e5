//! `sagavault status`: report on the vault without unlocking it.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;
use crate::storage::KeyValueStore;
use crate::vault::format::decode_salt;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let dir = vault.store().dir().display().to_string();

    if !vault.has_vault() {
        output::info(&format!("No vault in {dir}"));
        output::tip("Run `sagavault init` to create one.");
        return Ok(());
    }

    output::info(&format!("Vault in {dir} (locked)"));

    // Salts are not secret, so the stored KDF can be shown without a password.
    match vault.store().get(&vault.config().salt_key)? {
        Some(bytes) => match decode_salt(&bytes) {
            Ok(record) => output::info(&format!("Key derivation: {}", record.kdf.algorithm())),
            Err(e) => output::warning(&e.to_string()),
        },
        None => output::warning("Salt record is missing; the vault cannot be unlocked."),
    }

    Ok(())
}
