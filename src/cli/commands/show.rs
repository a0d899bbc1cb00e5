//! `sagavault show`: print one item's fields.

use crate::cli::output;
use crate::cli::{item_index, unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(cli: &Cli, number: usize, reveal: bool) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let items = vault.get_items()?;
    vault.lock();

    let item = &items[item_index(number, items.len())?];
    output::print_item(item, reveal);

    if !reveal {
        output::tip("Pass --reveal to print the values.");
    }

    Ok(())
}
