//! Formatting functions for terminal output.
//!
//! Status lines go to stdout, errors and warnings to stderr. Colour is
//! dropped automatically when the stream is not a terminal.

use console::style;

use crate::collector::ErrorCollector;
use crate::domain::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Text shown at the end of a dry run
pub fn dry_run_summary(errors: &ErrorCollector) -> String {
    if errors.has_errors() {
        format!("dry-run completed with errors\n{}", errors)
    } else {
        "dry-run completed without errors".to_string()
    }
}

/// Print the dry-run summary, on stderr if errors were collected.
pub fn display_dry_run_summary(errors: &ErrorCollector) {
    let summary = dry_run_summary(errors);
    if errors.has_errors() {
        eprintln!("{}", style(summary).red());
    } else {
        println!("{}", style(summary).green());
    }
}

/// Display the computed version change for the chart.
///
/// # Arguments
/// * `chart` - Chart name
/// * `previous` - Chart version before the update
/// * `next` - New chart version
/// * `app` - Application version the chart now tracks
pub fn display_version_change(chart: &str, previous: &Version, next: &Version, app: &Version) {
    println!("\n{}", style(format!("Chart {}:", chart)).bold());
    println!("  From: {}", style(previous).red());
    println!("  To:   {}", style(next).green());
    println!("  App:  {}", style(app).cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;

    #[test]
    fn test_dry_run_summary_without_errors() {
        assert_eq!(
            dry_run_summary(&ErrorCollector::new()),
            "dry-run completed without errors"
        );
    }

    #[test]
    fn test_dry_run_summary_with_errors() {
        let mut errors = ErrorCollector::new();
        errors.add(ReleaseError::TokenNotSet);
        assert_eq!(
            dry_run_summary(&errors),
            "dry-run completed with errors\n\nErrors:\n • GITHUB_TOKEN environment variable not set\n\n"
        );
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed to stdout/stderr
        display_status("test status");
        display_success("test success");
        display_warning("test warning");
        display_error("test error");
    }
}
