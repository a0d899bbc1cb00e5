//! Configuration loaded from `.sagavault.toml`.

pub mod settings;

pub use settings::Settings;
