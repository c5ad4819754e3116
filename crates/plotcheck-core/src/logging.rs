//! File logging through tracing
//!
//! The console belongs to the report and the spinner, so diagnostics go to a
//! daily log file under the user's local data directory instead.

use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "PLOTCHECK_LOG";

/// Filter used when `PLOTCHECK_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "plotcheck=info,plotcheck_core=info,plotcheck_report=info,warn";

const LOG_FILE_PREFIX: &str = "plotcheck.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Initialize logging into [`log_directory()`].
///
/// # Examples
/// ```bash
/// PLOTCHECK_LOG=debug plotcheck ./logs
/// PLOTCHECK_LOG=plotcheck_core=trace plotcheck miner.log
/// ```
pub fn init() -> Result<()> {
    init_in(&log_directory())
}

/// Initialize logging into `log_dir`, creating it if needed.
///
/// Fails if a global subscriber is already installed.
pub fn init_in(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string())),
        )
        .try_init()
        .map_err(|e| Error::config(format!("Failed to install log subscriber: {}", e)))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "plotcheck starting"
    );
    Ok(())
}

/// `<data_local_dir>/plotcheck/logs`, or `./plotcheck/logs` without one
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plotcheck")
        .join("logs")
}
