//! `sagavault add`: append a new item to the vault.

use chrono::Utc;
use zeroize::Zeroizing;

use crate::cli::field_parser::build_item;
use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{Result, VaultError};

/// Field stamped onto new items unless the caller sets it.
const CREATED_AT: &str = "created_at";

/// Execute the `add` command.
pub fn execute(cli: &Cli, fields: &[String], secrets: &[String]) -> Result<()> {
    if fields.is_empty() && secrets.is_empty() {
        return Err(VaultError::CommandFailed(
            "nothing to add (pass FIELD=VALUE pairs or --secret FIELD)".into(),
        ));
    }

    let mut item = build_item(fields)?;

    // Hidden values are prompted for so they stay out of shell history.
    for name in secrets {
        let value = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Enter value for {name}"))
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?,
        );
        item.insert(name.as_str(), value.as_str());
    }

    if !item.contains(CREATED_AT) {
        item.insert(CREATED_AT, Utc::now().to_rfc3339());
    }

    let mut vault = unlock_vault(cli)?;
    let mut items = vault.get_items()?;
    items.push(item);
    vault.save_items(&items)?;
    vault.lock();

    output::success(&format!("Added item #{}", items.len()));
    Ok(())
}
