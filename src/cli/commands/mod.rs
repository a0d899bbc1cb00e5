//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod export;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod remove;
pub mod show;
pub mod status;
