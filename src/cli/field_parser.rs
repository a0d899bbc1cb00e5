//! `FIELD=VALUE` argument parsing for `add`.

use crate::errors::{Result, VaultError};
use crate::vault::Item;

/// Parse a single `FIELD=VALUE` argument into a (field, value) pair.
///
/// Returns `None` for arguments without `=` or with an empty field name.
/// Handles: double/single quotes around the value, values containing `=`.
pub fn parse_field(arg: &str) -> Option<(&str, &str)> {
    let (name, value) = arg.split_once('=')?;
    let name = name.trim();

    // Strip optional surrounding quotes from the value.
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    if name.is_empty() {
        return None;
    }

    Some((name, value))
}

/// Build an item from `FIELD=VALUE` arguments.  Later fields win.
pub fn build_item(args: &[String]) -> Result<Item> {
    let mut item = Item::new();
    for arg in args {
        let (name, value) = parse_field(arg).ok_or_else(|| {
            VaultError::CommandFailed(format!("expected FIELD=VALUE, got '{arg}'"))
        })?;
        item.insert(name, value);
    }
    Ok(item)
}
