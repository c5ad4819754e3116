//! plotcheck - Find plot files whose deadlines conflict with the pool
//!
//! This is the binary entry point. All logic lives in the library.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plotcheck::config::{init_config_dir, load_settings, load_settings_from};
use plotcheck::{run, RunOptions};
use plotcheck_core::UnmatchedPolicy;

/// plotcheck - Find plot files whose deadlines conflict with the pool
#[derive(Parser, Debug)]
#[command(name = "plotcheck")]
#[command(about = "Scan mining logs for plot files with conflicting deadlines", long_about = None)]
struct Args {
    /// Log files or directories of logs (default: current directory)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Also print a table combining every analyzed file
    #[arg(long)]
    merge: bool,

    /// Emit NDJSON events instead of tables
    #[arg(long)]
    json: bool,

    /// Handling of confirmations that match no found deadline
    /// (diagnostic, attribute_latest)
    #[arg(long, value_name = "POLICY")]
    policy: Option<UnmatchedPolicy>,

    /// Do not animate progress while scanning
    #[arg(long)]
    no_progress: bool,

    /// Settings file to use instead of .plotcheck/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a default .plotcheck/config.toml and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();

    // The report owns the console; a logging failure must not stop the run
    if let Err(e) = plotcheck_core::logging::init() {
        eprintln!("Logging disabled: {}", e);
    }

    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init_config {
        init_config_dir(&base_path)?;
        eprintln!(
            "Wrote default settings to {}",
            base_path.join(".plotcheck").join("config.toml").display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(&base_path),
    };

    if let Some(policy) = args.policy {
        settings.analysis.unmatched_policy = policy;
    }
    if args.no_progress || !std::io::stdout().is_terminal() {
        settings.display.progress = false;
    }

    let options = RunOptions {
        inputs: args.paths,
        merge: args.merge,
        json: args.json,
    };

    let summary = run(&options, &settings)?;

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        if !args.json {
            eprintln!("No log files were analyzed.");
        }
        Ok(ExitCode::FAILURE)
    }
}
