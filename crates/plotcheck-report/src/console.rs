//! Plain-text console helpers
//!
//! Widths are display widths, so plot file names with wide characters still
//! line up.

use unicode_width::UnicodeWidthStr;

/// Display width of `content` in terminal columns
pub fn display_width(content: &str) -> usize {
    UnicodeWidthStr::width(content)
}

/// Right-align `content` in a slot of `slot_size` columns.
///
/// Content wider than the slot is returned unchanged.
pub fn align_right(content: &str, slot_size: usize) -> String {
    let padding = slot_size.saturating_sub(display_width(content));
    format!("{}{}", whitespace(padding), content)
}

/// A run of '-' as wide as `content`
pub fn underline(content: &str) -> String {
    "-".repeat(display_width(content))
}

/// `size` spaces
pub fn whitespace(size: usize) -> String {
    " ".repeat(size)
}
