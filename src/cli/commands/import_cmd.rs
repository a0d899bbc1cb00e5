//! `sagavault import`: append items from a JSON file.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::Item;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let imported = read_items(Path::new(file))?;
    if imported.is_empty() {
        output::info("No items found in file.");
        return Ok(());
    }

    let mut vault = unlock_vault(cli)?;
    let mut items = vault.get_items()?;
    let count = imported.len();
    items.extend(imported);
    vault.save_items(&items)?;
    vault.lock();

    output::success(&format!("Imported {count} items ({} total)", items.len()));
    Ok(())
}

/// Parse a JSON array of objects into items.
fn read_items(path: &Path) -> Result<Vec<Item>> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .map_err(|e| VaultError::CommandFailed(format!("failed to read file: {e}")))?,
    );

    serde_json::from_str(&content).map_err(|e| {
        VaultError::CommandFailed(format!(
            "{} is not a JSON array of objects: {e}",
            path.display()
        ))
    })
}
