//! plotcheck Library
//!
//! Checks mining logs for plot files whose found deadlines the pool does not
//! confirm.

// Module declarations
pub mod config;
pub mod json;
pub mod runner;

// Re-export main entry points
pub use runner::{run, run_with_writers, RunOptions, RunSummary};
