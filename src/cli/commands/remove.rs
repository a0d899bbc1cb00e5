//! `sagavault remove`: delete an item from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{item_index, unlock_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, number: usize, force: bool) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let mut items = vault.get_items()?;
    let index = item_index(number, items.len())?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let label = items[index].label().unwrap_or("unnamed").to_string();
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove item #{number} ({label})?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            vault.lock();
            output::info("Cancelled.");
            return Ok(());
        }
    }

    items.remove(index);
    vault.save_items(&items)?;
    vault.lock();

    output::success(&format!("Removed item #{number} ({} left)", items.len()));
    Ok(())
}
