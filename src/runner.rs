//! Multi-file run orchestration
//!
//! Resolves the command-line inputs into log files, analyzes each one in
//! turn and prints its table (or its JSON event). A file that cannot be read
//! is reported and skipped; the rest of the run continues.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use plotcheck_core::prelude::*;
use plotcheck_core::{
    discover_log_files, LogAnalyzer, NoProgress, PlotFileRegistry, ProgressObserver,
};
use plotcheck_report::{render_diagnostics, render_stats_table, CursorAnimator};

use crate::config::Settings;
use crate::json::ReportEvent;

/// What to run, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Files and directories to analyze; empty means the current directory
    pub inputs: Vec<PathBuf>,

    /// Print a combined table over every analyzed file
    pub merge: bool,

    /// Emit NDJSON events instead of tables
    pub json: bool,
}

/// Outcome counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub analyzed: usize,
    pub failed: usize,

    /// Inputs that produced no log files at all
    pub skipped: usize,
}

impl RunSummary {
    /// A run succeeds when at least one log file was analyzed
    pub fn is_success(&self) -> bool {
        self.analyzed > 0
    }
}

/// Run against the process's stdout and stderr
pub fn run(options: &RunOptions, settings: &Settings) -> Result<RunSummary> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    run_with_writers(options, settings, &mut stdout.lock(), &mut stderr.lock())
}

/// Run with explicit report and error sinks
pub fn run_with_writers<O: Write, E: Write>(
    options: &RunOptions,
    settings: &Settings,
    out: &mut O,
    err: &mut E,
) -> Result<RunSummary> {
    let filter = settings.log_file_filter();
    let discovery = discover_log_files(&options.inputs, &filter);
    let analyzer = settings.analyzer();

    let mut summary = RunSummary {
        skipped: discovery.skipped.len(),
        ..RunSummary::default()
    };

    for skipped in &discovery.skipped {
        warn!("Skipped input {:?}: {}", skipped.path, skipped.reason);
        writeln!(err, "Skipping {}: {}", skipped.path.display(), skipped.reason)?;
    }

    info!(
        "Analyzing {} log files with {} policy",
        discovery.log_files.len(),
        analyzer.policy()
    );

    let mut combined = options.merge.then(PlotFileRegistry::new);

    for path in &discovery.log_files {
        let scanned = if options.json {
            analyzer.scan_path(path, &mut NoProgress)
        } else {
            scan_with_progress(&analyzer, path, settings, out)
        };

        match scanned {
            Ok(registry) => {
                summary.analyzed += 1;
                if options.json {
                    ReportEvent::file_analyzed(path, &registry).emit_to(out)?;
                } else {
                    write_report(out, &registry, &settings.display.placeholder)?;
                }
                if let Some(total) = combined.as_mut() {
                    *total = PlotFileRegistry::merge(total, &registry);
                }
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                summary.failed += 1;
                if e.is_recoverable() {
                    warn!("Could not read {:?}: {}", path, e);
                } else {
                    error!("Failed to analyze {:?}: {}", path, e);
                }
                if options.json {
                    ReportEvent::file_failed(path, &e).emit_to(out)?;
                } else {
                    writeln!(err, "Could not read {}: {}", path.display(), e)?;
                }
            }
        }
    }

    if let Some(total) = combined.filter(|_| summary.analyzed > 0) {
        if options.json {
            ReportEvent::combined(summary.analyzed, &total).emit_to(out)?;
        } else {
            writeln!(out, "COMBINED ({} files)", summary.analyzed)?;
            write_report(out, &total, &settings.display.placeholder)?;
        }
    }

    if options.json {
        ReportEvent::run_finished(summary.analyzed, summary.failed, summary.skipped)
            .emit_to(out)?;
    }

    info!(
        "Run finished: {} analyzed, {} failed, {} skipped",
        summary.analyzed, summary.failed, summary.skipped
    );

    Ok(summary)
}

/// Print the file header, then scan with the spinner if enabled
fn scan_with_progress<O: Write>(
    analyzer: &LogAnalyzer,
    path: &Path,
    settings: &Settings,
    out: &mut O,
) -> Result<PlotFileRegistry> {
    writeln!(out, "CHECKING FILE -> {}", path.display())?;

    if !settings.display.progress {
        return analyzer.scan_path(path, &mut NoProgress);
    }

    write!(out, "DEADLINES -> ")?;
    out.flush()?;

    let mut animator = CursorAnimator::new(
        &mut *out,
        &settings.display.spinner_frames,
        settings.display.frame_interval(),
    );
    let result = analyzer.scan_path(path, &mut animator);
    if result.is_err() {
        // A failed scan never reports finished(); end the progress row here
        animator.finished();
    }
    result
}

fn write_report<O: Write>(out: &mut O, registry: &PlotFileRegistry, placeholder: &str) -> Result<()> {
    write!(out, "{}", render_stats_table(&registry.report(), placeholder))?;
    if let Some(line) = render_diagnostics(registry) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    Ok(())
}
