//! # File Collector Module
//!
//! This module turns user-provided patterns (files, directories and globs)
//! into a lazy, de-duplicated sequence of absolute file paths in selection
//! order.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::ignore::IgnoreManager;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn", "CVS"];

/// One user-provided pattern, resolved against the current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  /// A single existing file
  File(PathBuf),
  /// An existing directory, walked recursively
  Dir(PathBuf),
  /// A glob pattern, expanded at iteration time
  Glob(String),
}

/// File collector for pattern matching and directory traversal.
pub struct FileCollector {
  current_dir: PathBuf,
}

impl FileCollector {
  pub const fn new(current_dir: PathBuf) -> Self {
    Self { current_dir }
  }

  /// Resolves patterns into selections, validating globs up front so a bad
  /// pattern fails the run before any file is touched.
  pub fn selections(&self, patterns: &[String]) -> Result<Vec<Selection>> {
    patterns
      .iter()
      .map(|pattern| {
        let path = clean_path(&self.current_dir.join(pattern));
        if path.is_dir() {
          Ok(Selection::Dir(path))
        } else if path.is_file() {
          Ok(Selection::File(path))
        } else {
          let source = path.to_string_lossy().to_string();
          glob::Pattern::new(&source).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
          Ok(Selection::Glob(source))
        }
      })
      .collect()
  }

  /// Lazily yields the selected files, skipping duplicates and ignored
  /// paths. Files keep the order of their selections; directory contents are
  /// sorted by name.
  pub fn files<'a>(
    &self,
    selections: Vec<Selection>,
    ignore: &'a IgnoreManager,
  ) -> impl Iterator<Item = PathBuf> + use<'a> {
    let mut seen = HashSet::new();
    selections
      .into_iter()
      .flat_map(expand)
      .filter(move |path| seen.insert(path.clone()))
      .filter(move |path| !ignore.is_ignored(path))
  }

  /// Collects every selected file.
  pub fn collect(&self, patterns: &[String], ignore: &IgnoreManager) -> Result<Vec<PathBuf>> {
    let selections = self.selections(patterns)?;
    let files: Vec<PathBuf> = self.files(selections, ignore).collect();
    debug!("Selected {} files", files.len());
    Ok(files)
  }
}

fn expand(selection: Selection) -> Box<dyn Iterator<Item = PathBuf>> {
  match selection {
    Selection::File(path) => Box::new(std::iter::once(path)),
    Selection::Dir(dir) => Box::new(
      WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
        .filter_map(|entry| match entry {
          Ok(entry) => Some(entry),
          Err(e) => {
            warn!("Error walking directory: {}", e);
            None
          }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path),
    ),
    Selection::Glob(pattern) => match glob::glob(&pattern) {
      Ok(paths) => Box::new(
        paths
          .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
              warn!("Error expanding glob: {}", e);
              None
            }
          })
          .filter(|path| path.is_file()),
      ),
      Err(e) => {
        warn!("Invalid glob pattern {}: {}", pattern, e);
        Box::new(std::iter::empty())
      }
    },
  }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
  entry.file_type().is_dir()
    && entry.depth() > 0
    && entry
      .file_name()
      .to_str()
      .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Removes `.` segments and resolves `..` segments lexically.
pub fn clean_path(path: &Path) -> PathBuf {
  let mut cleaned = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !cleaned.pop() {
          cleaned.push(component.as_os_str());
        }
      }
      other => cleaned.push(other.as_os_str()),
    }
  }
  cleaned
}

/// Path relative to `root` for display, or the path itself when it lies
/// elsewhere.
pub fn display_path(path: &Path, root: &Path) -> PathBuf {
  match path.strip_prefix(root) {
    Ok(relative) => relative.to_path_buf(),
    Err(_) => pathdiff::diff_paths(path, root)
      .filter(|relative| !relative.starts_with(".."))
      .unwrap_or_else(|| path.to_path_buf()),
  }
}
