//! # Processor Module
//!
//! This module is the batch driver: it visits the selected files in order,
//! classifies each one, runs the [`Engine`] on it and applies the result.
//!
//! The module is organized into two submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`file_collector`] - Pattern expansion and directory traversal
//!
//! Per-file problems never stop a batch. They are recorded in the run's
//! [`WarningLog`] and the next file is processed.

mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use file_collector::{FileCollector, Selection, clean_path, display_path};
pub use file_io::FileIO;
use tracing::{debug, warn};

use crate::diff::DiffManager;
use crate::engine::Engine;
use crate::file_types::{Classification, FileCategory, FileTypeTable};
use crate::history::YearResolver;
use crate::report::{FileOutcome, FileReport};
use crate::rewrite::ActionKind;
use crate::scanner::SourceFile;
use crate::verbose_log;
use crate::warnings::{WarningKind, WarningLog};

/// Cooperative cancellation flag, checked before each file.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// State owned by a single run: the warning log and the cancellation flag.
#[derive(Debug, Default)]
pub struct RunContext {
  pub warnings: WarningLog,
  pub cancel: CancellationToken,
}

impl RunContext {
  pub fn new(cancel: CancellationToken) -> Self {
    Self {
      warnings: WarningLog::new(),
      cancel,
    }
  }
}

/// Result of a batch run.
#[derive(Debug)]
pub struct RunOutcome {
  /// One report per visited file, in visiting order
  pub reports: Vec<FileReport>,
  /// Whether cancellation stopped the run early
  pub cancelled: bool,
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub engine: Engine,
  pub file_types: FileTypeTable,
  pub history: Arc<dyn YearResolver>,
  pub workspace_root: PathBuf,
  /// Only report planned changes
  pub check_only: bool,
  pub diff_manager: Option<DiffManager>,
}

/// Processor for a batch of files.
pub struct Processor {
  engine: Engine,
  file_types: FileTypeTable,
  history: Arc<dyn YearResolver>,
  workspace_root: PathBuf,
  check_only: bool,
  diff_manager: Option<DiffManager>,
}

impl Processor {
  pub fn new(config: ProcessorConfig) -> Self {
    Self {
      engine: config.engine,
      file_types: config.file_types,
      history: config.history,
      workspace_root: config.workspace_root,
      check_only: config.check_only,
      diff_manager: config.diff_manager,
    }
  }

  pub const fn check_only(&self) -> bool {
    self.check_only
  }

  /// Processes `files` in order. Stops early once cancellation is observed;
  /// files already written stay written.
  pub fn run<I>(&self, files: I, context: &RunContext) -> RunOutcome
  where
    I: IntoIterator<Item = PathBuf>,
  {
    let mut reports = Vec::new();

    for path in files {
      if context.cancel.is_cancelled() {
        debug!("Cancellation requested, stopping after {} files", reports.len());
        return RunOutcome {
          reports,
          cancelled: true,
        };
      }
      reports.push(self.process_file(&path, context));
    }

    RunOutcome {
      reports,
      cancelled: false,
    }
  }

  /// Processes a single file and records its warnings.
  pub fn process_file(&self, path: &Path, context: &RunContext) -> FileReport {
    let shown = display_path(path, &self.workspace_root);

    let category = match self.file_types.classify(path) {
      Classification::Known(category) => category,
      Classification::NoExtension => {
        context.warnings.push(WarningKind::NoExtension, &shown);
        return FileReport::aborted(shown, None, WarningKind::NoExtension);
      }
      Classification::Unknown => {
        verbose_log!("Skipping: {} (unknown extension)", shown.display());
        return FileReport::skipped(shown, None);
      }
    };

    if category == FileCategory::Properties && self.engine.policy().ignore_properties_files {
      verbose_log!("Skipping: {} (properties files ignored)", shown.display());
      return FileReport::skipped(shown, Some(category));
    }

    let text = match FileIO::read_text(path) {
      Ok(text) => text,
      Err(e) => {
        warn!("{:#}", e);
        context.warnings.push(WarningKind::IoFailure, &shown);
        return FileReport::aborted(shown, Some(category), WarningKind::IoFailure);
      }
    };

    let file = SourceFile::new(path, text, category);
    let decision = self.engine.plan(&file, self.history.as_ref());

    let mut warnings = decision.warnings.clone();
    if let Some(kind) = decision.aborted() {
      context.warnings.push(kind, &shown);
      return FileReport::aborted(shown, Some(category), kind);
    }

    let outcome = match decision.action.kind() {
      ActionKind::NoOp => FileOutcome::Unchanged,
      ActionKind::Insert => FileOutcome::Inserted,
      ActionKind::Replace => FileOutcome::Replaced,
    };

    let mut written = false;
    if decision.action.changes_file() {
      let updated = decision.action.apply(file.text());

      if let Some(diff_manager) = &self.diff_manager
        && let Err(e) = diff_manager.display_diff(&shown, file.text(), &updated)
      {
        warn!("Failed to render diff for {}: {:#}", shown.display(), e);
      }

      if !self.check_only {
        match FileIO::write_text(path, &updated) {
          Ok(()) => written = true,
          Err(e) => {
            warn!("{:#}", e);
            // The file is unchanged, so the decision's warnings no longer apply.
            warnings = vec![WarningKind::IoFailure];
          }
        }
      }
    }

    for kind in &warnings {
      context.warnings.push(*kind, &shown);
    }

    if written {
      verbose_log!("Updated: {}", shown.display());
    }

    FileReport {
      path: shown,
      category: Some(category),
      outcome: if warnings.contains(&WarningKind::IoFailure) {
        FileOutcome::Aborted
      } else {
        outcome
      },
      year: decision.year,
      warnings,
      written,
    }
  }
}
