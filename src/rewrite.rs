//! # Rewrite Module
//!
//! This module decides what to do with a file's copyright header once it
//! has been parsed and its last-modified year resolved, and renders the new
//! header text.
//!
//! The decision is pure: it never touches the file. [`Action::apply`]
//! produces the new text for the caller to write.

use std::ops::Range;

use serde::Serialize;

use crate::boilerplate::Boilerplate;
use crate::config::{Policy, UnresolvedYear};
use crate::copyright::CopyrightComment;
use crate::history::LastModified;
use crate::scanner::{BlockComment, SourceFile};
use crate::warnings::WarningKind;

/// What should happen to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Leave the file as is
  NoOp,
  /// Insert a new header at `offset`
  Insert { offset: usize, text: String },
  /// Replace the bytes in `span` with `text`
  Replace { span: Range<usize>, text: String },
}

impl Action {
  /// Applies the action to `text`, returning the new content.
  pub fn apply(&self, text: &str) -> String {
    match self {
      Action::NoOp => text.to_string(),
      Action::Insert { offset, text: header } => {
        let mut result = String::with_capacity(text.len() + header.len());
        result.push_str(&text[..*offset]);
        result.push_str(header);
        result.push_str(&text[*offset..]);
        result
      }
      Action::Replace { span, text: header } => {
        let mut result = text.to_string();
        result.replace_range(span.clone(), header);
        result
      }
    }
  }

  pub const fn changes_file(&self) -> bool {
    !matches!(self, Action::NoOp)
  }

  /// Short name used in reports.
  pub const fn kind(&self) -> ActionKind {
    match self {
      Action::NoOp => ActionKind::NoOp,
      Action::Insert { .. } => ActionKind::Insert,
      Action::Replace { .. } => ActionKind::Replace,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
  NoOp,
  Insert,
  Replace,
}

/// The outcome for one file: an action plus the warnings it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
  pub action: Action,
  pub warnings: Vec<WarningKind>,
  /// Revision year written into the header, when one was written.
  pub year: Option<i32>,
}

impl Decision {
  pub const fn no_op() -> Self {
    Self {
      action: Action::NoOp,
      warnings: Vec::new(),
      year: None,
    }
  }

  /// Leaves the file unchanged with a single warning.
  pub fn abort(kind: WarningKind) -> Self {
    Self {
      action: Action::NoOp,
      warnings: vec![kind],
      year: None,
    }
  }

  /// The abort reason, if this decision aborted.
  pub fn aborted(&self) -> Option<WarningKind> {
    self.warnings.iter().copied().find(|kind| kind.aborts())
  }
}

/// Inputs shared by every decision in a run.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
  pub policy: &'a Policy,
  pub boilerplate: &'a Boilerplate,
  /// No header is ever stamped with a later year.
  pub current_year: i32,
}

/// Decides between no-op, insert and replace for a parsed header.
///
/// `existing` is the comment `parsed` was read from, or `None` when the file
/// has no copyright comment. In replace-all mode `parsed` is expected to be a
/// default header and `existing` is the comment it replaces.
pub fn decide(
  file: &SourceFile,
  existing: Option<&BlockComment>,
  mut parsed: CopyrightComment,
  last_modified: LastModified,
  context: RewriteContext<'_>,
) -> Decision {
  let RewriteContext {
    policy,
    boilerplate,
    current_year,
  } = context;
  let has_header = existing.is_some() && parsed.revision_year().is_some();

  let mut year = match effective_year(last_modified, policy, has_header, current_year) {
    Some(year) => year,
    None => return Decision::abort(WarningKind::YearUnresolved),
  };

  if !policy.replace_all
    && let Some(revised) = parsed.revision_year()
  {
    if parsed.flags().cpl {
      year = year.max(revised);
    } else if year <= revised {
      return Decision::no_op();
    }
  }

  parsed.set_revision_year(year);
  let newline = file.newline();
  let mut warnings = Vec::new();

  let Some(existing) = existing else {
    let offset = file.insertion_offset();
    let mut text = String::new();
    if offset > 0 && !file.text()[..offset].ends_with('\n') {
      text.push_str(newline);
    }
    text.push_str(&parsed.render(boilerplate, newline));
    text.push_str(newline);
    return Decision {
      action: Action::Insert { offset, text },
      warnings,
      year: Some(year),
    };
  };

  if !existing.at_top() {
    warnings.push(WarningKind::NotAtTop);
  }

  let text = if parsed.flags().has_foreign() && policy.preserve_foreign_licenses {
    warnings.push(WarningKind::ForeignLicense);
    parsed.render_original(boilerplate, newline)
  } else {
    parsed.render(boilerplate, newline)
  };

  Decision {
    action: Action::Replace {
      span: existing.span(),
      text,
    },
    warnings,
    year: Some(year),
  }
}

/// Resolves the year to stamp. `None` means the file must be left alone.
///
/// Years after `current_year` (a skewed commit clock, say) are clamped so
/// the written header still parses on the next run.
fn effective_year(last_modified: LastModified, policy: &Policy, has_header: bool, current_year: i32) -> Option<i32> {
  if policy.use_fixed_revision_year {
    return Some(policy.fixed_revision_year.min(current_year));
  }

  let year = match last_modified {
    LastModified::Year(year) => Some(year),
    // An ignored commit never moves an existing header forward.
    LastModified::Ignored if has_header && !policy.replace_all => Some(0),
    LastModified::Ignored | LastModified::Unresolved => match policy.unresolved_year {
      UnresolvedYear::Default => Some(policy.default_revision_year),
      UnresolvedYear::Skip => None,
    },
  };
  year.map(|year| year.min(current_year))
}
