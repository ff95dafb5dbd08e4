//! # Warnings Module
//!
//! This module collects per-file warnings during a run, grouped by category
//! in the order each category was first seen, and renders them as the run's
//! log file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;

/// Indentation applied to each file path under its category line.
const PATH_INDENT: &str = "     ";

/// Kinds of warnings a file can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
  NoExtension,
  MultipleCopyrights,
  Unparseable,
  YearUnresolved,
  NotAtTop,
  ForeignLicense,
  IoFailure,
}

impl WarningKind {
  /// Whether this warning leaves the file unchanged.
  pub const fn aborts(self) -> bool {
    matches!(
      self,
      WarningKind::NoExtension
        | WarningKind::MultipleCopyrights
        | WarningKind::Unparseable
        | WarningKind::YearUnresolved
        | WarningKind::IoFailure
    )
  }
}

impl fmt::Display for WarningKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let message = match self {
      WarningKind::NoExtension => "File has no extension.  File UNCHANGED.",
      WarningKind::MultipleCopyrights => "Multiple copyrights found.  File UNCHANGED.",
      WarningKind::Unparseable => "Could not interpret copyright comment.  File UNCHANGED.",
      WarningKind::YearUnresolved => "Could not determine last modified year.  File UNCHANGED.",
      WarningKind::NotAtTop => {
        "Old copyright not at start of file, new copyright replaces old in same location."
      }
      WarningKind::ForeignLicense => {
        "Old copyright contains GPL, MPL, or Apple. Copyright unchanged. Date updated if necessary."
      }
      WarningKind::IoFailure => "File could not be read or written.  File UNCHANGED.",
    };
    f.write_str(message)
  }
}

/// Warning log collected over one run.
///
/// Categories keep the order in which they were first seen; within a
/// category, paths keep the order in which they were added.
#[derive(Debug, Default)]
pub struct WarningLog {
  entries: Mutex<Vec<(WarningKind, Vec<PathBuf>)>>,
}

impl WarningLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a warning for a file.
  pub fn push(&self, kind: WarningKind, path: &Path) {
    let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match entries.iter_mut().find(|(existing, _)| *existing == kind) {
      Some((_, paths)) => paths.push(path.to_path_buf()),
      None => entries.push((kind, vec![path.to_path_buf()])),
    }
  }

  /// Snapshot of the categories and their files.
  pub fn entries(&self) -> Vec<(WarningKind, Vec<PathBuf>)> {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).is_empty()
  }

  /// Total number of recorded warnings.
  pub fn len(&self) -> usize {
    self
      .entries
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
      .iter()
      .map(|(_, paths)| paths.len())
      .sum()
  }

  /// Renders the log: each category line followed by its file paths, one
  /// per line, indented.
  pub fn render(&self) -> String {
    let mut output = String::new();
    for (kind, paths) in self.entries() {
      output.push_str(&kind.to_string());
      output.push('\n');
      for path in paths {
        output.push_str(PATH_INDENT);
        output.push_str(&path.display().to_string());
        output.push('\n');
      }
    }
    output
  }

  /// Writes the rendered log to `path`, replacing any existing file.
  pub fn write_to(&self, path: &Path) -> Result<()> {
    std::fs::write(path, self.render()).with_context(|| format!("Failed to write log file: {}", path.display()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_categories_keep_first_seen_order() {
    let log = WarningLog::new();
    log.push(WarningKind::Unparseable, Path::new("a/One.java"));
    log.push(WarningKind::NoExtension, Path::new("Makefile"));
    log.push(WarningKind::Unparseable, Path::new("b/Two.java"));

    assert_eq!(log.len(), 3);
    assert_eq!(
      log.render(),
      "Could not interpret copyright comment.  File UNCHANGED.\n     a/One.java\n     b/Two.java\nFile has no extension.  File UNCHANGED.\n     Makefile\n"
    );
  }

  #[test]
  fn test_empty_log_renders_nothing() {
    let log = WarningLog::new();
    assert!(log.is_empty());
    assert_eq!(log.render(), "");
  }

  #[test]
  fn test_abort_kinds() {
    assert!(WarningKind::MultipleCopyrights.aborts());
    assert!(WarningKind::YearUnresolved.aborts());
    assert!(!WarningKind::NotAtTop.aborts());
    assert!(!WarningKind::ForeignLicense.aborts());
  }

  #[test]
  fn test_write_to_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("copyrightLog.txt");
    let log = WarningLog::new();
    log.push(WarningKind::NotAtTop, Path::new("x.c"));
    log.write_to(&path)?;

    let written = std::fs::read_to_string(&path)?;
    assert!(written.starts_with("Old copyright not at start of file"));
    assert!(written.ends_with("     x.c\n"));
    Ok(())
  }
}
