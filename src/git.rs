//! # Git Module
//!
//! This module contains functionality for interacting with git repositories:
//! locating the repository root and finding the year a file was last changed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, FixedOffset};
use git2::{Commit, Oid, Repository, Sort};
use tracing::warn;

use crate::history::{HistoryError, IgnoreHints, LastModified, YearResolver};
use crate::verbose_log;

/// Returns the working tree root of the repository containing `path`, or
/// `None` when `path` is not inside a non-bare repository.
pub fn discover_repo_root(path: &Path) -> Result<Option<PathBuf>> {
  let repo = match Repository::discover(path) {
    Ok(repo) => repo,
    Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
    Err(e) => return Err(e).with_context(|| format!("Failed to open git repository at {}", path.display())),
  };

  Ok(repo.workdir().map(Path::to_path_buf))
}

/// Year resolver backed by git history.
///
/// The most recent commit reachable from `HEAD` that changed the file's blob
/// decides the year. Commits whose message matches an [`IgnoreHints`] rule
/// yield [`LastModified::Ignored`].
pub struct GitYearResolver {
  // git2 repositories are not Sync.
  repo: Mutex<Repository>,
  workdir: PathBuf,
  hints: IgnoreHints,
}

impl GitYearResolver {
  /// Opens the repository containing `path`.
  pub fn open(path: &Path, hints: IgnoreHints) -> Result<Self, HistoryError> {
    let repo = Repository::discover(path)?;
    let workdir = repo.workdir().ok_or(HistoryError::Bare)?;
    let workdir = workdir.canonicalize()?;
    verbose_log!("Using git history from {}", workdir.display());

    Ok(Self {
      repo: Mutex::new(repo),
      workdir,
      hints,
    })
  }

  pub fn workdir(&self) -> &Path {
    &self.workdir
  }

  fn relative_path(&self, path: &Path) -> Result<PathBuf, HistoryError> {
    let absolute = path.canonicalize()?;
    absolute
      .strip_prefix(&self.workdir)
      .map(Path::to_path_buf)
      .map_err(|_| HistoryError::OutsideRepository(path.to_path_buf()))
  }

  fn lookup(&self, path: &Path) -> Result<LastModified, HistoryError> {
    let relative = self.relative_path(path)?;
    let repo = self.repo.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;

    for oid in revwalk {
      let commit = repo.find_commit(oid?)?;
      let Some(entry) = blob_id(&commit, &relative)? else {
        continue;
      };

      let parent_entry = match commit.parents().next() {
        Some(parent) => blob_id(&parent, &relative)?,
        None => None,
      };
      if parent_entry == Some(entry) {
        continue;
      }

      let message = commit.message().unwrap_or_default();
      if self.hints.is_ignored(message) {
        verbose_log!("Ignoring commit {} for {}", commit.id(), relative.display());
        return Ok(LastModified::Ignored);
      }

      return Ok(commit_year(&commit).map_or(LastModified::Unresolved, LastModified::Year));
    }

    Ok(LastModified::Unresolved)
  }
}

impl YearResolver for GitYearResolver {
  fn last_modified_year(&self, path: &Path) -> LastModified {
    match self.lookup(path) {
      Ok(result) => result,
      Err(e) => {
        warn!("Could not read history for {}: {}", path.display(), e);
        LastModified::Unresolved
      }
    }
  }
}

fn blob_id(commit: &Commit<'_>, path: &Path) -> Result<Option<Oid>, HistoryError> {
  let tree = commit.tree()?;
  match tree.get_path(path) {
    Ok(entry) => Ok(Some(entry.id())),
    Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// Commit year in the committer's own time zone.
fn commit_year(commit: &Commit<'_>) -> Option<i32> {
  let time = commit.time();
  let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
  let timestamp = DateTime::from_timestamp(time.seconds(), 0)?;
  Some(timestamp.with_timezone(&offset).year())
}
