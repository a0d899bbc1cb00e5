//! `sagavault init`: create a new, empty vault.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_password, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = open_vault(cli)?;

    // Never overwrite an existing vault.
    if vault.has_vault() {
        output::tip("Use `sagavault add` to store items in the existing vault.");
        return Err(VaultError::VaultAlreadyExists);
    }

    let password = prompt_new_password()?;
    vault.create_vault(password.as_bytes())?;
    vault.lock();

    output::success(&format!(
        "Vault created in {} (kdf: {})",
        vault.store().dir().display(),
        vault.config().kdf.algorithm()
    ));
    output::tip("Run `sagavault add title=<name> --secret password` to add an item.");
    output::tip("Run `sagavault list` to see all items.");

    Ok(())
}
