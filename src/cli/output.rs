//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;
use serde_json::Value;

use crate::vault::Item;

/// Shown instead of a field value unless `--reveal` is passed.
const MASK: &str = "********";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of items (#, Label, Fields).  No values are shown.
pub fn print_items_table(items: &[Item]) {
    if items.is_empty() {
        info("No items in this vault yet.");
        tip("Run `sagavault add title=<name> user=<login> --secret password` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Label", "Fields"]);

    for (i, item) in items.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            item.label().unwrap_or("-").to_string(),
            item.names().collect::<Vec<_>>().join(", "),
        ]);
    }

    println!("{table}");
}

/// Print one item as a two-column table.
pub fn print_item(item: &Item, reveal: bool) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    for (name, value) in item.iter() {
        let shown = if reveal {
            display_value(value)
        } else {
            MASK.to_string()
        };
        table.add_row(vec![name.to_string(), shown]);
    }

    println!("{table}");
}

/// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
