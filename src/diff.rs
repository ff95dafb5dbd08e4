//! # Diff Module
//!
//! This module renders line diffs of planned header changes, so a dry run
//! shows exactly what `--modify` would write.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each change.
const CONTEXT_LINES: usize = 3;

/// Manages diff rendering for planned header changes.
///
/// Diffs are printed to stderr when `show_diff` is set and appended to
/// `save_diff_path` when one is given.
pub struct DiffManager {
  show_diff: bool,
  save_diff_path: Option<PathBuf>,
  // Serializes appends from concurrent callers.
  file_lock: Mutex<()>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
      file_lock: Mutex::new(()),
    }
  }

  /// Whether diffs are produced at all.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(path) = &self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Renders a unified-style diff of `original` against `new`.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);
    let display = path.display().to_string();
    diff
      .unified_diff()
      .context_radius(CONTEXT_LINES)
      .header(&format!("a/{display}"), &format!("b/{display}"))
      .to_string()
  }

  /// Prints and/or saves the diff for one file.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_enabled() {
      return Ok(());
    }

    if self.show_diff {
      let diff = TextDiff::from_lines(original, new);
      eprintln!("Diff for {}:", path.display());
      for change in diff.iter_all_changes() {
        let line = match change.tag() {
          ChangeTag::Delete => format!("-{change}")
            .if_supports_color(Stream::Stderr, |l| l.red())
            .to_string(),
          ChangeTag::Insert => format!("+{change}")
            .if_supports_color(Stream::Stderr, |l| l.green())
            .to_string(),
          ChangeTag::Equal => continue,
        };
        eprint!("{line}");
        if change.missing_newline() {
          eprintln!();
        }
      }
      eprintln!();
    }

    if let Some(diff_path) = &self.save_diff_path {
      let _guard = self.file_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      file
        .write_all(Self::render(path, original, new).as_bytes())
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
