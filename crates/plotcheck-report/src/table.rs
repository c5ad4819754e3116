//! Plot file statistics table
//!
//! ```text
//! CONFLICTING   HEALTHY   PLOT FILE
//! -----------   -------   ---------
//!           -        12   1234_0_8192_8192
//!           2         9   1234_8192_8192_8192
//! ```

use plotcheck_core::{PlotFileRegistry, PlotFileSummary};

use crate::console::{align_right, underline};

pub const CORRUPTED_TITLE: &str = "CONFLICTING";
pub const HEALTHY_TITLE: &str = "HEALTHY";
pub const PLOT_FILE_TITLE: &str = "PLOT FILE";
const TITLE_GAP: &str = "   ";

/// Shown instead of a table when a log has no found deadlines
pub const NO_DEADLINES_MESSAGE: &str = "No deadlines detected.";

/// Default text for a zero count
pub const DEFAULT_PLACEHOLDER: &str = "-";

/// Render report rows as a right-aligned table, one line per plot file.
///
/// Zero counts render as `placeholder`. The result ends with a newline.
pub fn render_stats_table(rows: &[PlotFileSummary], placeholder: &str) -> String {
    if rows.is_empty() {
        return format!("{NO_DEADLINES_MESSAGE}\n");
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{CORRUPTED_TITLE}{TITLE_GAP}{HEALTHY_TITLE}{TITLE_GAP}{PLOT_FILE_TITLE}\n"
    ));
    out.push_str(&format!(
        "{}{TITLE_GAP}{}{TITLE_GAP}{}\n",
        underline(CORRUPTED_TITLE),
        underline(HEALTHY_TITLE),
        underline(PLOT_FILE_TITLE)
    ));

    for row in rows {
        out.push_str(&align_right(
            &count_cell(row.corrupted_count, placeholder),
            CORRUPTED_TITLE.len(),
        ));
        out.push_str(TITLE_GAP);
        out.push_str(&align_right(
            &count_cell(row.healthy_count, placeholder),
            HEALTHY_TITLE.len(),
        ));
        out.push_str(TITLE_GAP);
        out.push_str(&row.name);
        out.push('\n');
    }

    out
}

/// One-line diagnostic summary, or `None` when there is nothing to flag
pub fn render_diagnostics(registry: &PlotFileRegistry) -> Option<String> {
    let unmatched = registry.unmatched_confirmation_count();
    let malformed = registry.get_mining_log_error_count();
    let pending = registry.pending_count();

    if unmatched == 0 && malformed == 0 && pending == 0 {
        return None;
    }

    Some(format!(
        "Unmatched confirmations: {unmatched}   Unconfirmed deadlines: {pending}   Malformed lines: {malformed}"
    ))
}

fn count_cell(count: u64, placeholder: &str) -> String {
    if count == 0 {
        placeholder.to_string()
    } else {
        count.to_string()
    }
}
