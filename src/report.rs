//! # Report Module
//!
//! This module records what happened to each file in a run and writes the
//! JSON report requested with `--report-json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::file_types::FileCategory;
use crate::warnings::WarningKind;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutcome {
  /// A new header was inserted (or would be, in dry-run mode)
  Inserted,
  /// The existing header was replaced (or would be)
  Replaced,
  /// The header was already current
  Unchanged,
  /// Processing stopped with a warning; the file was left untouched
  Aborted,
  /// The file was not a candidate (unknown extension, ignored category)
  Skipped,
}

/// Information about a processed file for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
  /// Path as shown to the user (relative to the workspace root when possible)
  #[serde(serialize_with = "serialize_path")]
  pub path: PathBuf,
  pub category: Option<FileCategory>,
  pub outcome: FileOutcome,
  /// Revision year written into the header
  #[serde(skip_serializing_if = "Option::is_none")]
  pub year: Option<i32>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub warnings: Vec<WarningKind>,
  /// Whether the change reached the disk
  pub written: bool,
}

impl FileReport {
  pub fn skipped(path: PathBuf, category: Option<FileCategory>) -> Self {
    Self {
      path,
      category,
      outcome: FileOutcome::Skipped,
      year: None,
      warnings: Vec::new(),
      written: false,
    }
  }

  pub fn aborted(path: PathBuf, category: Option<FileCategory>, warning: WarningKind) -> Self {
    Self {
      path,
      category,
      outcome: FileOutcome::Aborted,
      year: None,
      warnings: vec![warning],
      written: false,
    }
  }
}

fn serialize_path<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
  S: serde::Serializer,
{
  serializer.serialize_str(&path.to_string_lossy())
}

/// Summary of the processing results.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
  /// Files selected for the run
  pub selected: usize,
  /// Files actually visited before the run ended
  pub visited: usize,
  pub inserted: usize,
  pub replaced: usize,
  pub unchanged: usize,
  pub aborted: usize,
  pub skipped: usize,
  pub warnings: usize,
  pub dry_run: bool,
  pub cancelled: bool,
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  pub timestamp: i64,
}

impl RunSummary {
  /// Tallies the reports of a run.
  pub fn from_reports(
    selected: usize,
    files: &[FileReport],
    dry_run: bool,
    cancelled: bool,
    processing_time: Duration,
  ) -> Self {
    let count = |outcome: FileOutcome| files.iter().filter(|file| file.outcome == outcome).count();

    Self {
      selected,
      visited: files.len(),
      inserted: count(FileOutcome::Inserted),
      replaced: count(FileOutcome::Replaced),
      unchanged: count(FileOutcome::Unchanged),
      aborted: count(FileOutcome::Aborted),
      skipped: count(FileOutcome::Skipped),
      warnings: files.iter().map(|file| file.warnings.len()).sum(),
      dry_run,
      cancelled,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    }
  }

  /// Files whose header was (or would be) changed.
  pub const fn changed(&self) -> usize {
    self.inserted + self.replaced
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a RunSummary,
  files: &'a [FileReport],
}

/// Renders the JSON report.
pub fn render_json(files: &[FileReport], summary: &RunSummary) -> Result<String> {
  serde_json::to_string_pretty(&JsonReport { summary, files }).with_context(|| "Failed to serialize report")
}

/// Writes the JSON report to `output_path`.
pub fn write_json(output_path: &Path, files: &[FileReport], summary: &RunSummary) -> Result<()> {
  let content = render_json(files, summary)?;
  std::fs::write(output_path, content)
    .with_context(|| format!("Failed to write report to {}", output_path.display()))
}
