//! Mining log analyzer
//!
//! Streams a log one line at a time, registers every found deadline under its
//! plot file and settles every confirmed deadline against the pending ones.
//! Found and confirmed events arrive interleaved and unordered; the registry's
//! pending sets are the only state carried from one line to the next.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ansi::strip_ansi_codes;
use crate::deadline::{parse_line, strip_line_terminator, Extracted};
use crate::prelude::*;
use crate::registry::{Outcome, PlotFileRegistry, PlotFileSummary};

// ─────────────────────────────────────────────────────────────────────────────
// Policy
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with a confirmed deadline that matches no pending found deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Only count it in the registry's unmatched-confirmation counter
    #[default]
    Diagnostic,

    /// Also blame the plot file that most recently submitted a found deadline
    /// which is still unpaired
    AttributeLatest,
}

impl FromStr for UnmatchedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "diagnostic" => Ok(UnmatchedPolicy::Diagnostic),
            "attribute_latest" => Ok(UnmatchedPolicy::AttributeLatest),
            _ => Err(Error::invalid_policy(s)),
        }
    }
}

impl std::fmt::Display for UnmatchedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmatchedPolicy::Diagnostic => write!(f, "diagnostic"),
            UnmatchedPolicy::AttributeLatest => write!(f, "attribute_latest"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Progress
// ─────────────────────────────────────────────────────────────────────────────

/// How a confirmed deadline was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Matched a pending found deadline
    Matched,

    /// Unmatched, blamed on the latest found deadline
    Attributed,

    /// Unmatched and not attributed to any plot file
    Unmatched,
}

/// Receives progress notifications while a log is analyzed.
///
/// The analyzer never depends on what an observer does; every method
/// defaults to doing nothing.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressObserver {
    /// Called after each line, with its 1-based line number
    fn line_processed(&mut self, _line_number: u64) {}

    /// Called when a confirmed deadline has been settled
    fn confirmation(&mut self, _outcome: ConfirmationOutcome) {}

    /// Called once after the last line
    fn finished(&mut self) {}
}

/// Observer that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

// ─────────────────────────────────────────────────────────────────────────────
// Analyzer
// ─────────────────────────────────────────────────────────────────────────────

/// Single-pass deadline matcher over one mining log
#[derive(Debug, Clone, Copy)]
pub struct LogAnalyzer {
    policy: UnmatchedPolicy,
    strip_ansi: bool,
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAnalyzer {
    pub fn new() -> Self {
        Self {
            policy: UnmatchedPolicy::default(),
            strip_ansi: false,
        }
    }

    pub fn with_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Strip ANSI escape sequences before looking for markers.
    ///
    /// Off by default: the plot file name and confirmed value then keep every
    /// character up to the end of the line.
    pub fn with_strip_ansi(mut self, strip_ansi: bool) -> Self {
        self.strip_ansi = strip_ansi;
        self
    }

    pub fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// Analyze a log and return its report rows in first-seen plot file order
    pub fn analyze<R: BufRead>(
        &self,
        reader: R,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Vec<PlotFileSummary>> {
        Ok(self.scan(reader, observer)?.report())
    }

    /// Open and scan the log file at `path`.
    ///
    /// The file is closed before this returns, whether or not the scan
    /// succeeded.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn scan_path(
        &self,
        path: &Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<PlotFileRegistry> {
        let file = File::open(path).map_err(|e| Error::log_file_open(path, e))?;
        self.scan(BufReader::new(file), observer)
    }

    /// Scan a log into a fresh registry
    pub fn scan<R: BufRead>(
        &self,
        mut reader: R,
        observer: &mut dyn ProgressObserver,
    ) -> Result<PlotFileRegistry> {
        let mut registry = PlotFileRegistry::new();
        let mut buf = Vec::new();
        let mut line_number: u64 = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            // Binary garbage must not abort the scan
            let decoded = String::from_utf8_lossy(&buf);
            let line = strip_line_terminator(&decoded);
            if self.strip_ansi {
                self.process_line(&strip_ansi_codes(line), line_number, &mut registry, observer);
            } else {
                self.process_line(line, line_number, &mut registry, observer);
            }

            observer.line_processed(line_number);
        }

        observer.finished();

        info!(
            "Scanned {} lines: {} plot files, {} resolved, {} pending, {} unmatched confirmations, {} malformed lines",
            line_number,
            registry.len(),
            registry.total_stats().total(),
            registry.pending_count(),
            registry.unmatched_confirmation_count(),
            registry.get_mining_log_error_count()
        );

        Ok(registry)
    }

    fn process_line(
        &self,
        line: &str,
        line_number: u64,
        registry: &mut PlotFileRegistry,
        observer: &mut dyn ProgressObserver,
    ) {
        let events = parse_line(line);
        if events.is_empty() {
            return;
        }

        if events.is_malformed() {
            debug!("Malformed deadline line {}: {:?}", line_number, events);
            registry.increment_mining_log_error_count();
        }

        if let Extracted::Present(found) = events.found {
            trace!(
                "Line {}: found deadline {} in {}",
                line_number,
                found.deadline,
                found.plot_file
            );
            registry.add_found_deadline(found.plot_file, found.deadline);
        }

        if let Extracted::Present(confirmed) = events.confirmed {
            let outcome = self.settle_confirmation(confirmed, line_number, registry);
            observer.confirmation(outcome);
        }
    }

    fn settle_confirmation(
        &self,
        confirmed: &str,
        line_number: u64,
        registry: &mut PlotFileRegistry,
    ) -> ConfirmationOutcome {
        if let Some(id) = registry.resolve_confirmed(confirmed) {
            trace!(
                "Line {}: confirmed deadline {} matches {}",
                line_number,
                confirmed,
                registry.record(id).map(|r| r.name()).unwrap_or_default()
            );
            return ConfirmationOutcome::Matched;
        }

        registry.increment_unmatched_confirmation_count();

        if self.policy == UnmatchedPolicy::AttributeLatest {
            if let Some((id, found)) = registry.take_latest_unconfirmed() {
                debug!(
                    "Line {}: confirmed deadline {} conflicts with found deadline {}",
                    line_number, confirmed, found
                );
                registry.record_resolution(id, &found, Outcome::Corrupted);
                return ConfirmationOutcome::Attributed;
            }
        }

        debug!(
            "Line {}: confirmed deadline {} matches no pending deadline",
            line_number, confirmed
        );
        ConfirmationOutcome::Unmatched
    }
}
