//! # Workspace Module
//!
//! This module picks the directory a run is anchored to. The workspace root
//! is where the config file, `.copyrightignore` and the log file live, and
//! what displayed paths are relative to.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::git;

/// Workspace root selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workspace {
  /// Rooted at the working tree of a git repository; history is available.
  Git { root: PathBuf },
  /// Rooted at a plain directory.
  Directory { root: PathBuf },
}

impl Workspace {
  pub fn root(&self) -> &Path {
    match self {
      Self::Git { root } | Self::Directory { root } => root.as_path(),
    }
  }

  pub const fn is_git(&self) -> bool {
    matches!(self, Self::Git { .. })
  }
}

/// Resolves the workspace for a run started in `current_dir`.
///
/// The repository enclosing the first existing pattern (or `current_dir`
/// when no pattern exists) wins. Outside a repository the workspace is
/// `current_dir`.
pub fn resolve_workspace(current_dir: &Path, patterns: &[String]) -> Result<Workspace> {
  let probe = patterns
    .iter()
    .map(|pattern| current_dir.join(pattern))
    .find_map(|candidate| {
      if candidate.is_dir() {
        Some(candidate)
      } else if candidate.is_file() {
        candidate.parent().map(Path::to_path_buf)
      } else {
        None
      }
    })
    .unwrap_or_else(|| current_dir.to_path_buf());

  if let Some(root) = git::discover_repo_root(&probe)? {
    let root = root.canonicalize().unwrap_or(root);
    return Ok(Workspace::Git { root });
  }

  Ok(Workspace::Directory {
    root: current_dir.to_path_buf(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_directory_workspace_is_current_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // Only meaningful when the temp dir is not inside a checkout.
    if git2::Repository::discover(dir.path()).is_ok() {
      return Ok(());
    }
    std::fs::create_dir(dir.path().join("src"))?;
    std::fs::write(dir.path().join("build.sh"), "")?;

    let workspace = resolve_workspace(dir.path(), &["missing".to_string(), "src".to_string()])?;
    assert_eq!(
      workspace,
      Workspace::Directory {
        root: dir.path().to_path_buf()
      }
    );
    assert!(!workspace.is_git());

    let workspace = resolve_workspace(dir.path(), &["build.sh".to_string()])?;
    assert_eq!(workspace.root(), dir.path());

    let workspace = resolve_workspace(dir.path(), &[])?;
    assert_eq!(workspace.root(), dir.path());
    Ok(())
  }
}
