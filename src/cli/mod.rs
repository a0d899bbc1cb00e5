//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod field_parser;
pub mod output;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::storage::FileStore;
use crate::vault::{UnlockOutcome, Vault};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable checked before prompting for a password.
const PASSWORD_ENV: &str = "SAGAVAULT_PASSWORD";

/// sagavault CLI: password-protected secret vault.
#[derive(Parser)]
#[command(name = "sagavault", about = "Password-protected secret vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: `vault_dir` from .sagavault.toml, else .sagavault)
    #[arg(long, global = true, env = "SAGAVAULT_DIR")]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Show whether a vault exists and how it is configured
    Status,

    /// List all items
    List,

    /// Show one item's fields
    Show {
        /// Item number, as printed by `list`
        index: usize,
        /// Print values instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Add an item built from FIELD=VALUE pairs
    Add {
        /// Fields, e.g. title=mail user=ada
        fields: Vec<String>,
        /// Field whose value is read from a hidden prompt (repeatable)
        #[arg(short, long = "secret", value_name = "FIELD")]
        secrets: Vec<String>,
    },

    /// Remove an item
    Remove {
        /// Item number, as printed by `list`
        index: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export decrypted items as JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import items from a JSON array of objects
    Import {
        /// Path to the file to import
        file: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault password from `SAGAVAULT_PASSWORD`, or prompt for it.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used during `init`).
///
/// Also respects `SAGAVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            let pw = Zeroizing::new(pw);
            if pw.chars().count() < MIN_PASSWORD_LEN {
                return Err(VaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(pw);
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose vault password")
                .with_confirmation(
                    "Confirm vault password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

/// Open the vault described by the CLI arguments and settings, still locked.
pub fn open_vault(cli: &Cli) -> Result<Vault<FileStore>> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let dir = match &cli.vault_dir {
        Some(dir) => cwd.join(dir),
        None => settings.vault_path(&cwd),
    };

    Vault::open_with_config(FileStore::new(dir), settings.vault_config()?)
}

/// Open the vault and unlock it with the user's password.
///
/// A rejected password becomes `UnlockRejected` here; the CLI has no use
/// for a locked vault.
pub fn unlock_vault(cli: &Cli) -> Result<Vault<FileStore>> {
    let mut vault = open_vault(cli)?;
    if !vault.has_vault() {
        output::tip("Run `sagavault init` to create a vault.");
        return Err(VaultError::VaultNotFound);
    }

    let password = prompt_password()?;
    match vault.unlock(password.as_bytes())? {
        UnlockOutcome::Unlocked => Ok(vault),
        UnlockOutcome::Rejected => Err(VaultError::UnlockRejected),
    }
}

/// Turn a 1-based item number into a vector index.
pub fn item_index(number: usize, len: usize) -> Result<usize> {
    if number == 0 || number > len {
        return Err(VaultError::ItemNotFound(number));
    }
    Ok(number - 1)
}
