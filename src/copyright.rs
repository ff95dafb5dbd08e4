//! # Copyright Module
//!
//! This module interprets a block comment as the organization's copyright
//! header. Parsing is strict about the legal text (holder and license
//! statement) but tolerant of whitespace, line endings and comment
//! decoration. A comment that does not match yields `None`; it is never
//! partially understood.
//!
//! A parsed [`CopyrightComment`] can be re-rendered from the boilerplate, or,
//! when its body must not be touched, rendered from its original text with
//! only the year field replaced.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::boilerplate::{Boilerplate, CONTRIBUTORS_LABEL, collapse_whitespace};
use crate::file_types::{CommentFormat, CommentSyntax, FileCategory};
use crate::scanner::BlockComment;

/// Matches the copyright statement line once decoration is stripped.
static COPYRIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^copyright\s*\(c\)\s*(\d{4})(?:\s*,\s*(\d{4}))?\s+(.+)$").expect("copyright line regex must compile")
});

/// Locates the year field inside the raw comment text.
static RAW_YEARS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)copyright\s*\(c\)\s*(\d{4}(?:\s*,\s*\d{4})?)").expect("raw years regex must compile")
});

/// License markers found in a header's raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LicenseFlags {
  /// Legacy Common Public License statement
  pub cpl: bool,
  /// GNU license text
  pub gpl: bool,
  /// Mozilla license text
  pub mpl: bool,
  /// Apple Computer copyright text
  pub apple: bool,
}

impl LicenseFlags {
  /// Detects markers in raw comment text. Matching is case-sensitive.
  pub fn detect(text: &str) -> Self {
    Self {
      cpl: text.contains("Common Public License"),
      gpl: text.contains("GPL"),
      mpl: text.contains("MPL"),
      apple: text.contains("Apple Computer"),
    }
  }

  /// Whether any third-party license marker is present.
  pub const fn has_foreign(&self) -> bool {
    self.gpl || self.mpl || self.apple
  }
}

/// Original header text with the location of its year field.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OriginalHeader {
  text: String,
  years: Range<usize>,
}

/// A recognized copyright header, or the default header for a file that has
/// none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyrightComment {
  category: FileCategory,
  creation_year: Option<i32>,
  revision_year: Option<i32>,
  contributors: Vec<String>,
  original: Option<OriginalHeader>,
  flags: LicenseFlags,
}

impl CopyrightComment {
  /// A fresh header with no years yet.
  pub const fn default_for(category: FileCategory) -> Self {
    Self {
      category,
      creation_year: None,
      revision_year: None,
      contributors: Vec::new(),
      original: None,
      flags: LicenseFlags {
        cpl: false,
        gpl: false,
        mpl: false,
        apple: false,
      },
    }
  }

  pub const fn category(&self) -> FileCategory {
    self.category
  }

  /// The first year of a range, or the single year.
  pub const fn creation_year(&self) -> Option<i32> {
    self.creation_year
  }

  /// The later year of a range, or the single year. `None` for a default
  /// header.
  pub const fn revision_year(&self) -> Option<i32> {
    self.revision_year
  }

  pub fn set_revision_year(&mut self, year: i32) {
    self.revision_year = Some(year);
  }

  pub fn contributors(&self) -> &[String] {
    &self.contributors
  }

  pub const fn flags(&self) -> LicenseFlags {
    self.flags
  }

  /// Whether this header came from existing text.
  pub const fn is_parsed(&self) -> bool {
    self.original.is_some()
  }

  /// Year field text: `"start, end"` for a range, otherwise a single year.
  pub fn years_text(&self) -> String {
    match (self.creation_year, self.revision_year) {
      (Some(start), Some(end)) if start != end => format!("{start}, {end}"),
      (_, Some(year)) | (Some(year), None) => year.to_string(),
      (None, None) => String::new(),
    }
  }

  /// Renders a header from the boilerplate with the current years.
  pub fn render(&self, boilerplate: &Boilerplate, newline: &str) -> String {
    boilerplate.render(&self.category.format(), &self.years_text(), &self.contributors, newline)
  }

  /// Renders the original header text with only the year field replaced.
  /// Falls back to [`render`](Self::render) for a default header.
  pub fn render_original(&self, boilerplate: &Boilerplate, newline: &str) -> String {
    match &self.original {
      Some(original) => {
        let mut text = original.text.clone();
        text.replace_range(original.years.clone(), &self.years_text());
        text
      }
      None => self.render(boilerplate, newline),
    }
  }
}

/// Parses a block comment as a copyright header.
///
/// Returns the default header when `comment` is `None`, the parsed header on
/// a match, and `None` when the comment is not the expected boilerplate or
/// carries a year after `current_year`.
pub fn parse(
  comment: Option<&BlockComment>,
  category: FileCategory,
  boilerplate: &Boilerplate,
  current_year: i32,
) -> Option<CopyrightComment> {
  let Some(comment) = comment else {
    return Some(CopyrightComment::default_for(category));
  };

  let format = category.format();
  let flags = LicenseFlags::detect(comment.contents());
  let lines = logical_lines(comment.contents(), &format);

  let Some((first, rest)) = lines.split_first() else {
    trace!("Empty comment");
    return None;
  };

  let captures = COPYRIGHT_LINE.captures(first)?;
  let creation: i32 = captures[1].parse().ok()?;
  let revision: i32 = match captures.get(2) {
    Some(year) => year.as_str().parse().ok()?,
    None => creation,
  };
  if revision < creation || revision > current_year {
    trace!("Rejecting years {}, {} (current year {})", creation, revision, current_year);
    return None;
  }

  if collapse_whitespace(captures[3].trim_end_matches('.')) != boilerplate.normalized_holder() {
    trace!("Holder mismatch: {}", &captures[3]);
    return None;
  }

  let label_index = rest.iter().position(|line| line.eq_ignore_ascii_case(CONTRIBUTORS_LABEL));
  let (statement_lines, contributors) = match label_index {
    Some(index) => (&rest[..index], rest[index + 1..].to_vec()),
    None => (rest, Vec::new()),
  };

  let statement = collapse_whitespace(&statement_lines.join(" "));
  let recognized = statement == boilerplate.license_statement() || statement == Boilerplate::legacy_statement();
  if !recognized && !flags.has_foreign() {
    trace!("Unrecognized license statement: {}", statement);
    return None;
  }

  let years = RAW_YEARS.captures(comment.contents())?.get(1)?.range();

  Some(CopyrightComment {
    category,
    creation_year: Some(creation),
    revision_year: Some(revision),
    contributors,
    original: Some(OriginalHeader {
      text: comment.contents().to_string(),
      years,
    }),
    flags,
  })
}

/// Strips comment delimiters and decoration from each line, dropping lines
/// left empty (banners, blank separators).
fn logical_lines(contents: &str, format: &CommentFormat) -> Vec<String> {
  contents
    .lines()
    .map(|line| strip_decoration(line, format.syntax))
    .filter(|line| !line.is_empty())
    .collect()
}

fn strip_decoration(line: &str, syntax: CommentSyntax) -> String {
  let mut text = line.trim();

  match syntax {
    CommentSyntax::Block { start, end } => {
      text = text.strip_prefix(start).unwrap_or(text);
      text = text.strip_suffix(end).unwrap_or(text);
    }
    CommentSyntax::Line { prefix } => {
      if text.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix)) {
        text = &text[prefix.len()..];
      }
    }
  }

  text.trim_start().trim_start_matches(['*', '#']).trim().to_string()
}
