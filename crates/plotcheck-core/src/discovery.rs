//! Mining log discovery module
//!
//! Turns the paths named on the command line into the list of log files to
//! analyze. Files are taken as given; directories are listed. Inputs that
//! cannot be used are reported back instead of failing the run.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Default directory depth: only the named directory itself
pub const DEFAULT_MAX_DEPTH: usize = 0;

/// Directories never descended into during recursive listing
const SKIP_DIRECTORIES: &[&str] = &["node_modules", "target", "__pycache__", "$RECYCLE.BIN"];

/// Which directory entries count as mining logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileFilter {
    /// Accepted extensions without the dot, compared case-insensitively.
    /// Empty accepts every regular file.
    pub extensions: Vec<String>,

    /// Include entries whose name starts with '.'
    pub include_hidden: bool,

    /// How many directory levels below a named directory to descend
    pub max_depth: usize,
}

impl Default for LogFileFilter {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            include_hidden: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LogFileFilter {
    /// Check a file name against the hidden and extension rules
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !self.include_hidden && name.starts_with('.') {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

/// An input that produced no log files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of log discovery
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// Log files to analyze, in input order; each directory's files sorted
    pub log_files: Vec<PathBuf>,
    /// Inputs that could not be used (missing, unreadable)
    pub skipped: Vec<SkippedPath>,
}

/// Collect the log files named by `inputs`.
///
/// With no inputs the current directory is listed. A file is skipped rather
/// than listed twice when several inputs reach it.
pub fn discover_log_files(inputs: &[PathBuf], filter: &LogFileFilter) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();

    let default_input = [PathBuf::from(".")];
    let inputs = if inputs.is_empty() {
        &default_input[..]
    } else {
        inputs
    };

    for input in inputs {
        if input.is_file() {
            debug!("Input is a file: {:?}", input);
            push_unique(&mut result.log_files, input.clone());
        } else if input.is_dir() {
            let before = result.log_files.len();
            match list_log_files(input, filter) {
                Ok(files) => {
                    for file in files {
                        push_unique(&mut result.log_files, file);
                    }
                    debug!(
                        "Found {} log files in {:?}",
                        result.log_files.len() - before,
                        input
                    );
                }
                Err(err) => result.skipped.push(SkippedPath {
                    path: input.clone(),
                    reason: err.to_string(),
                }),
            }
        } else {
            debug!("Input does not exist: {:?}", input);
            result.skipped.push(SkippedPath {
                path: input.clone(),
                reason: "No such file or directory".to_string(),
            });
        }
    }

    result
}

/// List the log files of one directory, sorted by path
pub fn list_log_files(dir: &Path, filter: &LogFileFilter) -> std::io::Result<Vec<PathBuf>> {
    // The top-level directory must be readable; nested failures are only traced
    let entries = fs::read_dir(dir)?;
    let mut files = Vec::new();
    collect_recursive(entries, 0, filter, &mut files);
    files.sort();
    Ok(files)
}

fn collect_recursive(
    entries: fs::ReadDir,
    current_depth: usize,
    filter: &LogFileFilter,
    files: &mut Vec<PathBuf>,
) {
    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_file() {
            if filter.accepts(&path) {
                files.push(path);
            } else {
                trace!("Skipping non-log file: {:?}", path);
            }
            continue;
        }

        if !path.is_dir() || current_depth >= filter.max_depth {
            continue;
        }

        let dir_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };

        if !filter.include_hidden && dir_name.starts_with('.') {
            trace!("Skipping hidden directory: {:?}", path);
            continue;
        }

        if SKIP_DIRECTORIES.contains(&dir_name) {
            trace!("Skipping excluded directory: {:?}", path);
            continue;
        }

        match fs::read_dir(&path) {
            Ok(nested) => collect_recursive(nested, current_depth + 1, filter, files),
            Err(err) => trace!("Cannot read directory {:?}: {}", path, err),
        }
    }
}

fn push_unique(files: &mut Vec<PathBuf>, path: PathBuf) {
    if !files.contains(&path) {
        files.push(path);
    }
}
