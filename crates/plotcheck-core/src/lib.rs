//! # plotcheck-core - Mining Log Analysis
//!
//! Foundation crate for plotcheck. Pairs the deadlines a miner found with the
//! deadlines its pool confirmed and keeps per-plot-file statistics.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Registry (`registry`)
//! - [`PlotFileRegistry`] - Plot file records, pending deadlines, diagnostic counters
//! - [`PlotFileStats`] - Healthy / corrupted counters
//! - [`PlotFileSummary`] - One report row
//!
//! ### Analyzer (`analyzer`)
//! - [`LogAnalyzer`] - Single-pass found/confirmed deadline matcher
//! - [`UnmatchedPolicy`] - Handling of confirmations that match nothing
//! - [`ProgressObserver`] - Per-line progress hook (see [`NoProgress`])
//!
//! ### Line Extraction (`deadline`)
//! - [`parse_line()`] - Extract found and confirmed deadline events from a line
//!
//! ### Discovery (`discovery`)
//! - [`discover_log_files()`] - Resolve command-line paths into log files
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use plotcheck_core::prelude::*;
//! ```

pub mod analyzer;
pub mod ansi;
pub mod deadline;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod registry;

// Re-export commonly used types at crate root for convenience
pub use analyzer::{
    ConfirmationOutcome, LogAnalyzer, NoProgress, ProgressObserver, UnmatchedPolicy,
};
pub use ansi::strip_ansi_codes;
pub use deadline::{parse_line, Extracted, FoundDeadline, LineEvents};
pub use discovery::{
    discover_log_files, list_log_files, DiscoveryResult, LogFileFilter, SkippedPath,
    DEFAULT_MAX_DEPTH,
};
pub use error::{Error, Result, ResultExt};
pub use registry::{
    Outcome, PlotFileId, PlotFileRecord, PlotFileRegistry, PlotFileStats, PlotFileSummary,
    Resolution,
};
