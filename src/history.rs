//! # History Module
//!
//! This module defines the interface for looking up when a file was last
//! modified. It allows for replacing the history backend (git, a fixed table
//! in tests, or nothing at all) without modifying the engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result of a last-modified lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastModified {
  /// The year of the most recent change
  Year(i32),
  /// The most recent change should not count as a content change
  /// (a copyright-only commit, for instance)
  Ignored,
  /// History is unavailable for the file
  Unresolved,
}

/// Trait for last-modified lookups.
///
/// Implementations must be cheap to call repeatedly; the engine only asks
/// when the existing header's year might be stale.
pub trait YearResolver: Send + Sync {
  /// Returns when `path` was last modified.
  fn last_modified_year(&self, path: &Path) -> LastModified;
}

/// Resolver for when no history is available. Every lookup is unresolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl YearResolver for NoHistory {
  fn last_modified_year(&self, _path: &Path) -> LastModified {
    LastModified::Unresolved
  }
}

/// Resolver backed by a fixed table. Paths missing from the table are
/// unresolved.
#[derive(Debug, Clone, Default)]
pub struct FixedHistory {
  entries: HashMap<PathBuf, LastModified>,
}

impl FixedHistory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an entry, returning the resolver for chaining.
  pub fn with(mut self, path: impl Into<PathBuf>, result: LastModified) -> Self {
    self.entries.insert(path.into(), result);
    self
  }
}

impl YearResolver for FixedHistory {
  fn last_modified_year(&self, path: &Path) -> LastModified {
    self.entries.get(path).copied().unwrap_or(LastModified::Unresolved)
  }
}

/// Commit message hints that mark a change as not counting toward the
/// revision year.
#[derive(Debug, Clone, Default)]
pub struct IgnoreHints {
  substrings: Vec<String>,
}

impl IgnoreHints {
  /// Creates hints with extra message substrings on top of the built-in ones.
  pub fn new(substrings: Vec<String>) -> Self {
    Self { substrings }
  }

  /// Whether a commit with this message should be ignored.
  ///
  /// Built-in rules: any mention of "copyright" (case-insensitive), or a
  /// message naming both "CPL" and "EPL" (a license migration).
  pub fn is_ignored(&self, message: &str) -> bool {
    if message.to_lowercase().contains("copyright") {
      return true;
    }
    if message.contains("CPL") && message.contains("EPL") {
      return true;
    }
    self
      .substrings
      .iter()
      .any(|needle| !needle.is_empty() && message.contains(needle.as_str()))
  }
}

/// Errors raised while reading history. Resolvers map these to
/// [`LastModified::Unresolved`] after logging them.
#[derive(Debug, Error)]
pub enum HistoryError {
  #[error("path {0} is outside the repository working tree")]
  OutsideRepository(PathBuf),

  #[error("repository has no working tree")]
  Bare,

  #[error("git error: {0}")]
  Git(#[from] git2::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
