//! plotcheck-report - Console presentation for plotcheck
//!
//! Renders analysis results for a terminal: the per-plot-file statistics
//! table, the small text helpers it is built from, and the spinner that runs
//! while a log is scanned.

pub mod animator;
pub mod console;
pub mod table;

// Re-export main entry points
pub use animator::CursorAnimator;
pub use table::{render_diagnostics, render_stats_table, DEFAULT_PLACEHOLDER, NO_DEADLINES_MESSAGE};
