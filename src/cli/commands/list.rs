//! `sagavault list`: display all items in a table.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let items = vault.get_items()?;
    vault.lock();

    output::info(&format!("{} item(s)", items.len()));
    output::print_items_table(&items);

    Ok(())
}
