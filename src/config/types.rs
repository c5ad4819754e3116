//! Configuration types for plotcheck

use std::time::Duration;

use plotcheck_core::{LogAnalyzer, LogFileFilter, UnmatchedPolicy, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Settings from .plotcheck/config.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub analysis: AnalysisSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl Settings {
    /// Discovery filter for the `[scan]` section
    pub fn log_file_filter(&self) -> LogFileFilter {
        LogFileFilter {
            extensions: self.scan.extensions.clone(),
            include_hidden: self.scan.include_hidden,
            max_depth: self.scan.max_depth,
        }
    }

    /// Analyzer configured from the `[scan]` and `[analysis]` sections
    pub fn analyzer(&self) -> LogAnalyzer {
        LogAnalyzer::new()
            .with_policy(self.analysis.unmatched_policy)
            .with_strip_ansi(self.scan.strip_ansi)
    }
}

/// Which inputs are read and how
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanSettings {
    /// Log file extensions without the dot (empty = every file)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Include hidden files and directories
    #[serde(default)]
    pub include_hidden: bool,

    /// Directory levels to descend below a named directory
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Strip ANSI escape sequences from log lines
    #[serde(default)]
    pub strip_ansi: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            include_hidden: false,
            max_depth: default_max_depth(),
            strip_ansi: false,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_true() -> bool {
    true
}

/// Matching behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisSettings {
    /// What to do with a confirmation no plot file submitted
    #[serde(default)]
    pub unmatched_policy: UnmatchedPolicy,
}

/// Console output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// Show the spinner while a log is scanned
    #[serde(default = "default_true")]
    pub progress: bool,

    #[serde(default = "default_spinner_frames")]
    pub spinner_frames: Vec<String>,

    /// Minimum milliseconds between spinner frames
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Shown in the table instead of a zero count
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl DisplaySettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            progress: true,
            spinner_frames: default_spinner_frames(),
            frame_interval_ms: default_frame_interval_ms(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_spinner_frames() -> Vec<String> {
    plotcheck_report::animator::DEFAULT_FRAMES
        .iter()
        .map(|f| f.to_string())
        .collect()
}

fn default_frame_interval_ms() -> u64 {
    let interval = plotcheck_report::animator::DEFAULT_FRAME_INTERVAL;
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

fn default_placeholder() -> String {
    plotcheck_report::DEFAULT_PLACEHOLDER.to_string()
}
