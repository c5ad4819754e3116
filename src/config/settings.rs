//! Settings parser for .plotcheck/config.toml

use super::types::Settings;
use plotcheck_core::prelude::*;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.toml";
const PLOTCHECK_DIR: &str = ".plotcheck";

const DEFAULT_CONFIG: &str = r#"# plotcheck configuration

[scan]
extensions = []         # Empty = every file in a named directory
include_hidden = false
max_depth = 0           # 0 = only the named directory itself
strip_ansi = false      # true removes color codes captured from a console

[analysis]
# "diagnostic": unmatched confirmations are only counted
# "attribute_latest": also blame the latest pending found deadline
unmatched_policy = "diagnostic"

[display]
progress = true
spinner_frames = ["-", "\\", "|", "/"]
frame_interval_ms = 6
placeholder = "-"       # Shown instead of a zero count
"#;

/// Load settings from .plotcheck/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(PLOTCHECK_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Load settings from a file named explicitly on the command line.
///
/// Unlike [`load_settings`], a missing or invalid file is an error.
pub fn load_settings_from(config_path: &Path) -> Result<Settings> {
    if !config_path.is_file() {
        return Err(Error::config_not_found(config_path));
    }

    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let settings = toml::from_str(&content).map_err(|e| {
        Error::config_invalid(format!("{}: {}", config_path.display(), e.message()))
    })?;

    debug!("Loaded settings from {:?}", config_path);
    Ok(settings)
}

/// Create the default config file in .plotcheck/
///
/// An existing config.toml is left untouched.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let plotcheck_dir = project_path.join(PLOTCHECK_DIR);

    if !plotcheck_dir.exists() {
        std::fs::create_dir_all(&plotcheck_dir)
            .map_err(|e| Error::config(format!("Failed to create .plotcheck dir: {}", e)))?;
    }

    let config_path = plotcheck_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created {:?}", config_path);
    }

    Ok(())
}
