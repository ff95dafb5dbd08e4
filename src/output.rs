//! # Output Module
//!
//! This module centralizes all user-facing output for fixcopyright: progress
//! lines, the changed-file lists, the warning log echo and the summary.
//!
//! Stdout stays predictable for piping: in quiet mode only the warning log
//! is printed, without colors or headings.

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileOutcome, FileReport, RunSummary};
use crate::warnings::WarningLog;

/// Symbols used in output
pub mod symbols {
  /// Header inserted
  pub const INSERTED: &str = "+";
  /// Header replaced
  pub const REPLACED: &str = "\u{21bb}"; // ↻
  /// Warning category
  pub const WARNING: &str = "!";
  /// Nothing to do
  pub const SUCCESS: &str = "\u{2713}"; // ✓
}

/// Maximum number of files to show in a list before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the opening progress lines.
pub fn print_start_message(file_count: usize, check_only: bool) {
  if is_quiet() {
    return;
  }

  println!("Start Fixing Copyrights");
  println!("Resources selected: {}", file_count);
  if check_only {
    println!(
      "{}",
      "Dry run: no files will be modified (use --modify to write changes)"
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files whose header was (or would be) inserted or replaced.
pub fn print_changed_files(reports: &[FileReport], check_only: bool) {
  if is_quiet() {
    return;
  }

  let inserted: Vec<&Path> = paths_with(reports, FileOutcome::Inserted);
  let replaced: Vec<&Path> = paths_with(reports, FileOutcome::Replaced);

  let (insert_verb, replace_verb) = if check_only {
    ("Would insert header in", "Would update header in")
  } else {
    ("Inserted header in", "Updated header in")
  };

  print_file_list(
    &format!(
      "{} {}",
      symbols::INSERTED.if_supports_color(Stream::Stdout, |s| s.green()),
      insert_verb
    ),
    &inserted,
  );
  if !inserted.is_empty() && !replaced.is_empty() {
    println!();
  }
  print_file_list(
    &format!(
      "{} {}",
      symbols::REPLACED.if_supports_color(Stream::Stdout, |s| s.yellow()),
      replace_verb
    ),
    &replaced,
  );

  if inserted.is_empty() && replaced.is_empty() {
    println!(
      "{} All copyright headers are up to date.",
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
    );
  }
}

fn paths_with(reports: &[FileReport], outcome: FileOutcome) -> Vec<&Path> {
  reports
    .iter()
    .filter(|report| report.outcome == outcome)
    .map(|report| report.path.as_path())
    .collect()
}

fn print_file_list(heading: &str, paths: &[&Path]) {
  if paths.is_empty() {
    return;
  }

  let count = paths.len();
  println!("{} {} {}:", heading, count, if count == 1 { "file" } else { "files" });

  let limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };
  for path in paths.iter().take(limit) {
    println!("  {}", path.display());
  }
  if count > limit {
    println!("  ... and {} more (use -v to see all)", count - limit);
  }
}

/// Echo the warning log to the console.
pub fn print_warning_log(log: &WarningLog) {
  if log.is_empty() {
    return;
  }

  if is_quiet() {
    print!("{}", log.render());
    return;
  }

  for (kind, paths) in log.entries() {
    println!(
      "{} {}",
      symbols::WARNING.if_supports_color(Stream::Stdout, |s| s.red()),
      kind.if_supports_color(Stream::Stdout, |s| s.yellow())
    );
    for path in paths {
      println!("     {}", path.display());
    }
  }
}

/// Print the processing summary.
///
/// Format: "Summary: X inserted, Y updated, Z unchanged, W unchanged with warnings, V skipped"
pub fn print_summary(summary: &RunSummary) {
  if is_quiet() {
    return;
  }

  let aborted = if summary.aborted > 0 {
    summary
      .aborted
      .if_supports_color(Stream::Stdout, |s| s.red())
      .to_string()
  } else {
    summary.aborted.to_string()
  };

  println!(
    "Summary: {} inserted, {} updated, {} unchanged, {} left untouched with warnings, {} skipped",
    summary.inserted.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.replaced.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.unchanged,
    aborted,
    summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );

  if summary.cancelled {
    println!(
      "{}",
      format!("Cancelled after {} of {} files.", summary.visited, summary.selected)
        .if_supports_color(Stream::Stdout, |s| s.yellow())
    );
  }
}

/// Print the closing progress lines.
pub fn print_done(elapsed: Duration) {
  if is_quiet() {
    return;
  }

  println!("Done Fixing Copyrights");
  println!("Total time: {:.2}s", elapsed.as_secs_f64());
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use super::*;
  use crate::warnings::WarningKind;

  #[test]
  fn test_paths_with_filters_by_outcome() {
    let reports = vec![
      FileReport::skipped(PathBuf::from("README.md"), None),
      FileReport {
        path: PathBuf::from("src/A.java"),
        category: None,
        outcome: FileOutcome::Inserted,
        year: Some(2024),
        warnings: Vec::new(),
        written: true,
      },
      FileReport::aborted(PathBuf::from("Makefile"), None, WarningKind::NoExtension),
    ];

    assert_eq!(paths_with(&reports, FileOutcome::Inserted), vec![Path::new("src/A.java")]);
    assert!(paths_with(&reports, FileOutcome::Replaced).is_empty());
    assert_eq!(paths_with(&reports, FileOutcome::Skipped), vec![Path::new("README.md")]);
  }
}
