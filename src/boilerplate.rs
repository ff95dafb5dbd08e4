//! # Boilerplate Module
//!
//! This module holds the organization's standard copyright header: the
//! copyright holder, the license statement and the default contributor line.
//! It renders that template into a comment for a given [`CommentFormat`].
//!
//! ## Example
//!
//! ```rust
//! use fixcopyright::boilerplate::Boilerplate;
//! use fixcopyright::file_types::FileCategory;
//!
//! let boilerplate = Boilerplate::default();
//! let header = boilerplate.render(&FileCategory::Source.format(), "2000, 2024", &[], "\n");
//! assert!(header.contains(" * Copyright (c) 2000, 2024 IBM Corporation and others."));
//! ```

use crate::file_types::CommentFormat;

/// Default copyright holder.
pub const DEFAULT_HOLDER: &str = "IBM Corporation and others";

/// Default contributor line for freshly created headers.
pub const DEFAULT_CONTRIBUTOR: &str = "IBM Corporation - initial API and implementation";

/// Current license statement, one entry per rendered line.
pub const DEFAULT_LICENSE: &[&str] = &[
  "All rights reserved. This program and the accompanying materials",
  "are made available under the terms of the Eclipse Public License v1.0",
  "which accompanies this distribution, and is available at",
  "http://www.eclipse.org/legal/epl-v10.html",
];

/// Legacy Common Public License statement. Headers carrying it are
/// recognized and migrated to the current statement.
pub const LEGACY_CPL_LICENSE: &[&str] = &[
  "All rights reserved. This program and the accompanying materials",
  "are made available under the terms of the Common Public License v1.0",
  "which accompanies this distribution, and is available at",
  "http://www.eclipse.org/legal/cpl-v10.html",
];

/// Label that opens the contributors section.
pub const CONTRIBUTORS_LABEL: &str = "Contributors:";

/// Indentation of each contributor entry under the label.
const CONTRIBUTOR_INDENT: &str = "    ";

/// The fixed legal text surrounding the copyright year(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
  /// Copyright holder, without trailing period
  pub holder: String,
  /// License statement lines
  pub license: Vec<String>,
  /// Contributor listed when a header has none
  pub default_contributor: String,
}

impl Default for Boilerplate {
  fn default() -> Self {
    Self {
      holder: DEFAULT_HOLDER.to_string(),
      license: DEFAULT_LICENSE.iter().map(|line| (*line).to_string()).collect(),
      default_contributor: DEFAULT_CONTRIBUTOR.to_string(),
    }
  }
}

impl Boilerplate {
  /// License statement with whitespace collapsed, for comparison.
  pub fn license_statement(&self) -> String {
    collapse_whitespace(&self.license.join(" "))
  }

  /// Legacy CPL statement with whitespace collapsed, for comparison.
  pub fn legacy_statement() -> String {
    collapse_whitespace(&LEGACY_CPL_LICENSE.join(" "))
  }

  /// Holder with whitespace collapsed and any trailing period removed.
  pub fn normalized_holder(&self) -> String {
    collapse_whitespace(self.holder.trim_end_matches('.'))
  }

  /// The copyright statement line for the given year text.
  pub fn copyright_line(&self, years: &str) -> String {
    format!("Copyright (c) {} {}.", years, self.holder.trim_end_matches('.'))
  }

  /// Renders a complete header comment in the given comment format.
  ///
  /// `contributors` falls back to the default contributor when empty. The
  /// result has no trailing newline.
  pub fn render(&self, format: &CommentFormat, years: &str, contributors: &[String], newline: &str) -> String {
    let text_line = |text: &str| format!("{}{}", format.middle, text);

    let mut lines = Vec::with_capacity(self.license.len() + contributors.len() + 6);
    lines.push(format.top.clone());
    lines.push(text_line(&self.copyright_line(years)));
    lines.extend(self.license.iter().map(|line| text_line(line)));
    lines.push(format.blank.clone());
    lines.push(text_line(CONTRIBUTORS_LABEL));

    if contributors.is_empty() {
      lines.push(text_line(&format!("{CONTRIBUTOR_INDENT}{}", self.default_contributor)));
    } else {
      lines.extend(
        contributors
          .iter()
          .map(|contributor| text_line(&format!("{CONTRIBUTOR_INDENT}{contributor}"))),
      );
    }

    lines.push(format.bottom.clone());
    lines.join(newline)
  }
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}
