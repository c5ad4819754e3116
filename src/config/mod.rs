//! Configuration file parsing for plotcheck
//!
//! Supports:
//! - `.plotcheck/config.toml` - Project settings
//! - `--config <FILE>` - An explicit settings file

pub mod settings;
pub mod types;

pub use settings::{init_config_dir, load_settings, load_settings_from};
pub use types::*;
