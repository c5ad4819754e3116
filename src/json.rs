//! JSON report output
//!
//! With `--json`, the runner writes structured events instead of tables and
//! spinners, so scripts can consume results without parsing console text.
//!
//! # Event Format
//!
//! Events are output as NDJSON (newline-delimited JSON), one event per line.
//! Each event has an "event" field indicating its type, along with event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"file_analyzed","path":"miner.log","plot_files":[{"name":"plotA","healthy_count":1,"corrupted_count":0,"pending_count":0}],"unmatched_confirmations":0,"malformed_lines":0,"timestamp":1704700001000}
//! {"event":"file_failed","path":"gone.log","error":"Failed to open mining log gone.log: No such file or directory (os error 2)","timestamp":1704700001005}
//! {"event":"run_finished","analyzed":1,"failed":1,"skipped":0,"timestamp":1704700001006}
//! ```

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use plotcheck_core::prelude::*;
use plotcheck_core::{PlotFileRegistry, PlotFileSummary};
use serde::Serialize;

/// Events emitted in JSON mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    /// One log file was scanned
    FileAnalyzed {
        path: String,
        plot_files: Vec<PlotFileSummary>,
        unmatched_confirmations: u64,
        malformed_lines: u64,
        timestamp: i64,
    },

    /// A log file could not be read
    FileFailed {
        path: String,
        error: String,
        timestamp: i64,
    },

    /// Merged results over every analyzed file
    Combined {
        files: usize,
        plot_files: Vec<PlotFileSummary>,
        unmatched_confirmations: u64,
        malformed_lines: u64,
        timestamp: i64,
    },

    /// Run summary, always the last event
    RunFinished {
        analyzed: usize,
        failed: usize,
        skipped: usize,
        timestamp: i64,
    },
}

impl ReportEvent {
    /// Write this event as one NDJSON line
    pub fn emit_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)
            .and_then(|_| out.flush())
            .map_err(|e| Error::output(format!("Failed to write JSON event: {}", e)))
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn file_analyzed(path: &Path, registry: &PlotFileRegistry) -> Self {
        Self::FileAnalyzed {
            path: path.display().to_string(),
            plot_files: registry.report(),
            unmatched_confirmations: registry.unmatched_confirmation_count(),
            malformed_lines: registry.get_mining_log_error_count(),
            timestamp: Self::now(),
        }
    }

    pub fn file_failed(path: &Path, error: &Error) -> Self {
        Self::FileFailed {
            path: path.display().to_string(),
            error: error.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn combined(files: usize, registry: &PlotFileRegistry) -> Self {
        Self::Combined {
            files,
            plot_files: registry.report(),
            unmatched_confirmations: registry.unmatched_confirmation_count(),
            malformed_lines: registry.get_mining_log_error_count(),
            timestamp: Self::now(),
        }
    }

    pub fn run_finished(analyzed: usize, failed: usize, skipped: usize) -> Self {
        Self::RunFinished {
            analyzed,
            failed,
            skipped,
            timestamp: Self::now(),
        }
    }
}
