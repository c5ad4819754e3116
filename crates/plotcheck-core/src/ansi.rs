//! Escape sequence removal for logs captured from a colored console
//!
//! A color reset right after `confirmed deadline: ` would otherwise become
//! part of the deadline value and never match its found counterpart.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

const ESC: char = '\x1b';

/// Control sequences (colors, cursor moves), operating system commands
/// (window titles) and two-byte escapes.
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-9;?]*[A-Za-z]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[A-Za-z])")
        .expect("ANSI regex pattern is valid")
});

/// Remove escape sequences from one log line.
///
/// Lines without an ESC byte skip the regex and come back borrowed.
///
/// ```
/// use plotcheck_core::strip_ansi_codes;
///
/// let line = "\x1b[32mconfirmed deadline: 1042\x1b[0m";
/// assert_eq!(strip_ansi_codes(line), "confirmed deadline: 1042");
/// ```
pub fn strip_ansi_codes(line: &str) -> Cow<'_, str> {
    if !line.contains(ESC) {
        return Cow::Borrowed(line);
    }
    ESCAPE_SEQUENCE.replace_all(line, "")
}
