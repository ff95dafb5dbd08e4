//! # Engine Module
//!
//! This module runs the per-file state machine: scan the file for copyright
//! comments, parse the header, resolve the last-modified year when it is
//! needed, and hand everything to [`rewrite::decide`](crate::rewrite::decide).
//!
//! ```text
//! Unscanned -> NoComment | SingleComment | MultipleComments (abort)
//!           -> Parsed | Unparseable (abort)
//!           -> NoOp | Insert | Replace
//! ```

use tracing::{debug, trace};

use crate::boilerplate::Boilerplate;
use crate::config::Policy;
use crate::copyright::{self, CopyrightComment};
use crate::history::{LastModified, YearResolver};
use crate::rewrite::{self, Decision, RewriteContext};
use crate::scanner::SourceFile;
use crate::warnings::WarningKind;

/// Decides the rewrite for individual files. Holds only read-only run state.
#[derive(Debug, Clone)]
pub struct Engine {
  policy: Policy,
  boilerplate: Boilerplate,
  current_year: i32,
}

impl Engine {
  pub const fn new(policy: Policy, boilerplate: Boilerplate, current_year: i32) -> Self {
    Self {
      policy,
      boilerplate,
      current_year,
    }
  }

  pub const fn policy(&self) -> &Policy {
    &self.policy
  }

  pub const fn boilerplate(&self) -> &Boilerplate {
    &self.boilerplate
  }

  pub const fn current_year(&self) -> i32 {
    self.current_year
  }

  /// Plans the rewrite for one file. Never fails: every problem becomes a
  /// warning on the returned decision.
  pub fn plan(&self, file: &SourceFile, history: &dyn YearResolver) -> Decision {
    if file.has_multiple_copyrights() {
      debug!("Multiple copyright comments in {}", file.path().display());
      return Decision::abort(WarningKind::MultipleCopyrights);
    }
    let existing = file.first_copyright_comment();
    let existing = existing.as_ref();

    let parsed = if self.policy.replace_all {
      Some(CopyrightComment::default_for(file.category()))
    } else {
      copyright::parse(existing, file.category(), &self.boilerplate, self.current_year)
    };
    let Some(parsed) = parsed else {
      debug!("Unparseable copyright comment in {}", file.path().display());
      return Decision::abort(WarningKind::Unparseable);
    };

    let last_modified = self.last_modified(file, &parsed, history);
    trace!("{}: last modified {:?}", file.path().display(), last_modified);

    rewrite::decide(
      file,
      existing,
      parsed,
      last_modified,
      RewriteContext {
        policy: &self.policy,
        boilerplate: &self.boilerplate,
        current_year: self.current_year,
      },
    )
  }

  /// Queries history only when the answer can matter: not in fixed-year
  /// mode, and not when the header is already stamped with the current year.
  fn last_modified(&self, file: &SourceFile, parsed: &CopyrightComment, history: &dyn YearResolver) -> LastModified {
    if self.policy.use_fixed_revision_year {
      return LastModified::Year(self.policy.fixed_revision_year);
    }
    match parsed.revision_year() {
      Some(revised) if revised >= self.current_year => LastModified::Year(revised),
      _ => history.last_modified_year(file.path()),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;
  use crate::file_types::FileCategory;
  use crate::history::{FixedHistory, NoHistory};
  use crate::rewrite::{Action, ActionKind};

  struct CountingHistory {
    calls: AtomicUsize,
    result: LastModified,
  }

  impl YearResolver for CountingHistory {
    fn last_modified_year(&self, _path: &Path) -> LastModified {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.result
    }
  }

  fn header(years: &str) -> String {
    Boilerplate::default().render(&FileCategory::Source.format(), years, &[], "\n")
  }

  fn engine(policy: Policy) -> Engine {
    Engine::new(policy, Boilerplate::default(), 2025)
  }

  #[test]
  fn test_multiple_copyrights_abort_regardless_of_policy() {
    let text = format!("{}\n/* Copyright (c) 1999 Someone Else */\nclass A {{}}\n", header("2010"));
    let file = SourceFile::new("A.java", text, FileCategory::Source);

    let mut policy = Policy::defaults(2025);
    policy.replace_all = true;
    let decision = engine(policy).plan(&file, &NoHistory);
    assert_eq!(decision.aborted(), Some(WarningKind::MultipleCopyrights));
    assert_eq!(decision.warnings.len(), 1);
  }

  #[test]
  fn test_unparseable_aborts() {
    let text = "/* Copyright (c) 2010 Acme Inc. All rights reserved. */\nclass A {}\n";
    let file = SourceFile::new("A.java", text.to_string(), FileCategory::Source);
    let decision = engine(Policy::defaults(2025)).plan(&file, &NoHistory);
    assert_eq!(decision.aborted(), Some(WarningKind::Unparseable));
  }

  #[test]
  fn test_replace_all_overwrites_unparseable_header() {
    let text = "/* Copyright (c) 2010 Acme Inc. All rights reserved. */\nclass A {}\n";
    let file = SourceFile::new("A.java", text.to_string(), FileCategory::Source);
    let mut policy = Policy::defaults(2025);
    policy.replace_all = true;

    let history = FixedHistory::new().with("A.java", LastModified::Year(2012));
    let decision = engine(policy).plan(&file, &history);

    assert_eq!(decision.action.kind(), ActionKind::Replace);
    let updated = decision.action.apply(file.text());
    assert!(updated.contains("Copyright (c) 2012 IBM Corporation and others."));
    assert!(!updated.contains("Acme"));
  }

  #[test]
  fn test_history_skipped_for_current_year_header() {
    let text = format!("{}\nclass A {{}}\n", header("2025"));
    let file = SourceFile::new("A.java", text, FileCategory::Source);
    let history = CountingHistory {
      calls: AtomicUsize::new(0),
      result: LastModified::Year(2025),
    };

    let decision = engine(Policy::defaults(2025)).plan(&file, &history);
    assert_eq!(decision.action, Action::NoOp);
    assert_eq!(history.calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn test_history_queried_for_stale_header() {
    let text = format!("{}\nclass A {{}}\n", header("2000, 2007"));
    let file = SourceFile::new("A.java", text, FileCategory::Source);
    let history = CountingHistory {
      calls: AtomicUsize::new(0),
      result: LastModified::Year(2020),
    };

    let decision = engine(Policy::defaults(2025)).plan(&file, &history);
    assert_eq!(history.calls.load(Ordering::SeqCst), 1);
    assert!(
      decision
        .action
        .apply(file.text())
        .contains("Copyright (c) 2000, 2020 IBM Corporation and others.")
    );
  }

  #[test]
  fn test_insert_then_rescan_is_idempotent() {
    let file = SourceFile::new("Foo.java", "class Foo {}\n".to_string(), FileCategory::Source);
    let history = FixedHistory::new().with("Foo.java", LastModified::Year(2024));
    let engine = engine(Policy::defaults(2025));

    let first = engine.plan(&file, &history);
    assert_eq!(first.action.kind(), ActionKind::Insert);

    let rewritten = SourceFile::new("Foo.java", first.action.apply(file.text()), FileCategory::Source);
    let second = engine.plan(&rewritten, &history);
    assert_eq!(second, Decision::no_op());
  }
}
