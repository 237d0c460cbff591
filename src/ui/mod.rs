//! User interface module - terminal formatting and diffs.
//!
//! - `formatter` - status, error and summary output
//! - `diff` - line diffs of changed chart files

pub mod diff;
pub mod formatter;

pub use diff::{diff_lines, write_diff, DiffLine};
pub use formatter::{
    display_dry_run_summary, display_error, display_status, display_success,
    display_version_change, display_warning, dry_run_summary,
};
