//! Report presentation: stdout lines and browser tabs.

use std::io::Write;

use tracing::{debug, warn};

use crate::checker::ForumResult;

/// Render one report line for a classified forum.
fn format_line(result: &ForumResult) -> String {
    match (&result.error, result.last_post) {
        (Some(error), _) => format!("{} | Error: {error}", result.url),
        (None, Some(date)) => format!("{} | Last Post: {date}", result.url),
        (None, None) => format!("{} | Last Post: None", result.url),
    }
}

/// Write the report, one line per forum, in classification order.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_report<W: Write>(results: &[ForumResult], mut out: W) -> std::io::Result<()> {
    for result in results {
        writeln!(out, "{}", format_line(result))?;
    }
    Ok(())
}

/// Print the report to stdout. Stdout carries only report lines;
/// diagnostics go through tracing.
pub fn print(results: &[ForumResult]) {
    if let Err(e) = write_report(results, std::io::stdout().lock()) {
        warn!("Failed to write report: {e}");
    }
}

/// Open each reported forum in a browser tab. Best-effort; failures are
/// logged and skipped.
pub fn open_in_browser(results: &[ForumResult]) {
    for result in results {
        match webbrowser::open(&result.url) {
            Ok(()) => debug!(url = %result.url, "Opened in browser"),
            Err(e) => warn!(url = %result.url, "Failed to open browser: {e}"),
        }
    }
}
