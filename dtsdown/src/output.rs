//! Console output formatting: status lines, progress, and the stats table.

use crate::downlevel::RunSummary;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

/// Create a progress bar with file count.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total_files);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:30.cyan/dim} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

/// Prints the human-readable run summary.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary(
    writer: &mut impl Write,
    summary: &RunSummary,
    quiet: bool,
) -> std::io::Result<()> {
    writeln!(
        writer,
        "{} {} file(s) downleveled to {}",
        "[OK]".green(),
        summary.files_written,
        summary.target.to_string().bold()
    )?;
    if !summary.errors.is_empty() {
        writeln!(
            writer,
            "{} {} file(s) skipped with errors",
            "[!!]".yellow().bold(),
            summary.errors.len()
        )?;
        if !quiet {
            for error in &summary.errors {
                writeln!(
                    writer,
                    "  {} {}",
                    error.file.display().to_string().dimmed(),
                    error.message.red()
                )?;
            }
        }
    }
    Ok(())
}

/// Prints the per-rule firing-count table for `--stats`.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_stats_table(writer: &mut impl Write, summary: &RunSummary) -> std::io::Result<()> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rule", "Rewrites"]);
    let mut rows: Vec<(&str, usize)> = summary
        .rule_fires
        .iter()
        .map(|(id, count)| (*id, *count))
        .collect();
    rows.sort_unstable();
    for (id, count) in rows {
        table.add_row(vec![id.to_owned(), count.to_string()]);
    }
    writeln!(writer, "{table}")
}
