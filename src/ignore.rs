//! # Ignore Module
//!
//! This module decides which files are left out of a run. It supports:
//! - `.copyrightignore` in the workspace root (gitignore-style patterns)
//! - Command-line ignore patterns, using the same gitignore syntax

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::verbose_log;

/// Name of the workspace ignore file.
pub const IGNORE_FILENAME: &str = ".copyrightignore";

/// Manager for handling ignore patterns from the command line and the
/// workspace ignore file.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
///
/// use fixcopyright::ignore::IgnoreManager;
///
/// # fn main() -> anyhow::Result<()> {
/// let manager = IgnoreManager::new(Path::new("/work"), &["generated/".to_string()])?;
/// assert!(manager.is_ignored(Path::new("/work/generated/Parser.java")));
/// assert!(!manager.is_ignored(Path::new("/work/src/Main.java")));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IgnoreManager {
  cli: Gitignore,
  workspace: Option<Gitignore>,
  root_dir: PathBuf,
}

impl IgnoreManager {
  /// Creates a manager rooted at `root_dir` with command-line patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if any pattern is invalid.
  pub fn new(root_dir: &Path, cli_patterns: &[String]) -> Result<Self> {
    let mut builder = GitignoreBuilder::new(root_dir);
    for pattern in cli_patterns {
      let pattern = pattern.replace('\\', "/");
      builder
        .add_line(None, &pattern)
        .with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
    }
    let cli = builder.build().with_context(|| "Failed to build ignore matcher")?;

    Ok(Self {
      cli,
      workspace: None,
      root_dir: root_dir.to_path_buf(),
    })
  }

  /// Loads `.copyrightignore` from the workspace root, if present.
  pub fn load_ignore_file(&mut self) -> Result<()> {
    let ignore_path = self.root_dir.join(IGNORE_FILENAME);
    if !ignore_path.exists() {
      return Ok(());
    }

    verbose_log!("Loading ignore file: {}", ignore_path.display());
    let content = fs::read_to_string(&ignore_path)
      .with_context(|| format!("Failed to read ignore file: {}", ignore_path.display()))?;

    let mut builder = GitignoreBuilder::new(&self.root_dir);
    for line in content.lines() {
      let line = line.trim();
      if !line.is_empty() && !line.starts_with('#') {
        builder
          .add_line(Some(self.root_dir.clone()), line)
          .with_context(|| format!("Invalid pattern in {}: {}", ignore_path.display(), line))?;
      }
    }

    self.workspace = Some(builder.build().with_context(|| "Failed to build ignore matcher")?);
    Ok(())
  }

  /// Whether `path` (absolute, or relative to the workspace root) is ignored.
  pub fn is_ignored(&self, path: &Path) -> bool {
    let Some(relative) = self.relative(path) else {
      return false;
    };

    if self.cli.matched_path_or_any_parents(&relative, false).is_ignore() {
      verbose_log!("Skipping: {} (matches ignore pattern)", path.display());
      return true;
    }

    if let Some(workspace) = &self.workspace
      && workspace.matched_path_or_any_parents(&relative, false).is_ignore()
    {
      verbose_log!("Skipping: {} (matches {})", path.display(), IGNORE_FILENAME);
      return true;
    }

    false
  }

  /// Path relative to the root, without `.` components. `None` for paths
  /// outside the root.
  fn relative(&self, path: &Path) -> Option<PathBuf> {
    let relative = if path.is_absolute() {
      path.strip_prefix(&self.root_dir).ok()?
    } else {
      path
    };
    let cleaned: PathBuf = relative
      .components()
      .filter(|component| !matches!(component, Component::CurDir))
      .collect();
    (!cleaned.as_os_str().is_empty()).then_some(cleaned)
  }
}
