//! `sagavault export`: write decrypted items out as JSON.

use std::fs;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let items = vault.get_items()?;
    vault.lock();

    let content = Zeroizing::new(
        serde_json::to_string_pretty(&items)
            .map_err(|e| VaultError::SerializationError(format!("export: {e}")))?,
    );

    match output_path {
        Some(dest) => {
            fs::write(dest, content.as_bytes()).map_err(|e| {
                VaultError::CommandFailed(format!("failed to write export file: {e}"))
            })?;
            output::success(&format!("Exported {} items to {dest}", items.len()));
            output::warning("The export file is NOT encrypted. Delete it when done.");
        }
        None => {
            // Raw output only, so it can be piped.
            println!("{}", content.as_str());
        }
    }

    Ok(())
}
