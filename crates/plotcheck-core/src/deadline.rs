//! Deadline event extraction from mining log lines.
//!
//! Miner logs are free-form text. A line may report a deadline the miner found
//! locally:
//!
//! ```text
//! 21:04:13 [plotter] found deadline=4162 nonce=98712 for account: 1234 file: 1234_0_8192_8192
//! ```
//!
//! and/or the deadline the pool confirmed:
//!
//! ```text
//! 21:04:14 [network] confirmed deadline: 4162
//! ```
//!
//! Both events are located by literal markers. Each search runs over the whole
//! line with its own cursor, so a line carrying both events yields both.

/// Marker preceding a locally found deadline
pub const FOUND_DEADLINE_MARKER: &str = "found deadline=";

/// Marker terminating the found deadline value
pub const FOUND_DEADLINE_END_MARKER: &str = " nonce";

/// Marker preceding the plot file name, searched after the found deadline
pub const PLOT_FILE_MARKER: &str = "file: ";

/// Marker preceding a pool-confirmed deadline
pub const CONFIRMED_DEADLINE_MARKER: &str = "confirmed deadline: ";

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of looking for one kind of event on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extracted<T> {
    /// The event's marker does not occur on the line
    Absent,

    /// The marker occurs but the rest of the event is missing or empty
    Malformed(&'static str),

    /// A complete event
    Present(T),
}

impl<T> Extracted<T> {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Extracted::Malformed(_))
    }

    /// Convert into an `Option`, dropping the malformed reason
    pub fn present(self) -> Option<T> {
        match self {
            Extracted::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// A deadline found by the miner while reading a plot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundDeadline<'a> {
    /// Deadline value, exactly as logged
    pub deadline: &'a str,

    /// Plot file name: everything after `file: ` up to the end of the line
    pub plot_file: &'a str,
}

/// Every event extracted from a single log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEvents<'a> {
    pub found: Extracted<FoundDeadline<'a>>,
    pub confirmed: Extracted<&'a str>,
}

impl LineEvents<'_> {
    /// True when at least one marker was present but its event was incomplete
    pub fn is_malformed(&self) -> bool {
        self.found.is_malformed() || self.confirmed.is_malformed()
    }

    /// True when the line carries no recognized marker at all
    pub fn is_empty(&self) -> bool {
        matches!(self.found, Extracted::Absent) && matches!(self.confirmed, Extracted::Absent)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extract found and confirmed deadline events from a line.
///
/// The line must already have its line terminator removed. No other trimming
/// happens: trailing characters belong to the plot file name or the confirmed
/// value.
pub fn parse_line(line: &str) -> LineEvents<'_> {
    LineEvents {
        found: extract_found_deadline(line),
        confirmed: extract_confirmed_deadline(line),
    }
}

/// Extract `found deadline=<value> nonce ... file: <name>` from a line
pub fn extract_found_deadline(line: &str) -> Extracted<FoundDeadline<'_>> {
    let Some(marker_idx) = line.find(FOUND_DEADLINE_MARKER) else {
        return Extracted::Absent;
    };
    let value_start = marker_idx + FOUND_DEADLINE_MARKER.len();
    let after_marker = &line[value_start..];

    let Some(value_len) = after_marker.find(FOUND_DEADLINE_END_MARKER) else {
        return Extracted::Malformed("found deadline without nonce terminator");
    };
    let deadline = &after_marker[..value_len];
    if deadline.is_empty() {
        return Extracted::Malformed("empty found deadline");
    }

    let after_terminator = &after_marker[value_len + FOUND_DEADLINE_END_MARKER.len()..];
    let Some(file_idx) = after_terminator.find(PLOT_FILE_MARKER) else {
        return Extracted::Malformed("found deadline without plot file");
    };
    let plot_file = &after_terminator[file_idx + PLOT_FILE_MARKER.len()..];
    if plot_file.is_empty() {
        return Extracted::Malformed("empty plot file name");
    }

    Extracted::Present(FoundDeadline {
        deadline,
        plot_file,
    })
}

/// Extract `confirmed deadline: <value>` from a line
pub fn extract_confirmed_deadline(line: &str) -> Extracted<&str> {
    let Some(marker_idx) = line.find(CONFIRMED_DEADLINE_MARKER) else {
        return Extracted::Absent;
    };
    let value = &line[marker_idx + CONFIRMED_DEADLINE_MARKER.len()..];
    if value.is_empty() {
        return Extracted::Malformed("empty confirmed deadline");
    }
    Extracted::Present(value)
}

/// Remove one line terminator (`\n` or `\r\n`) from the end of a line
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
