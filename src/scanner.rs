//! # Scanner Module
//!
//! This module locates block comments in source text. It knows nothing about
//! copyright boilerplate beyond the marker tokens used to decide whether a
//! comment looks like a copyright header at all.
//!
//! A block comment opens at any occurrence of the start token outside an
//! earlier comment and closes at the first end token after it. A line-style
//! comment is a run of consecutive lines that begin with the prefix; a run
//! that holds a copyright line stops at its closing banner.

use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::file_types::{CommentFormat, CommentSyntax, FileCategory};

/// Case-insensitive markers that identify a copyright or license comment.
const COPYRIGHT_MARKERS: &[&str] = &["copyright", "common public license", "eclipse public license"];

/// A contiguous comment span within a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
  /// Byte offset of the start token (or line prefix)
  pub start: usize,
  /// Byte offset just past the end token (or the last comment line)
  pub end: usize,
  /// Raw comment text, delimiters included
  pub contents: String,
  /// Whether only whitespace (and an allowed shebang line) precedes it
  pub at_top: bool,
}

impl BlockComment {
  /// Byte range of the comment within its file.
  pub const fn span(&self) -> Range<usize> {
    self.start..self.end
  }

  /// Raw comment text.
  pub fn contents(&self) -> &str {
    &self.contents
  }

  /// Whether the comment sits at the very top of the file.
  pub const fn at_top(&self) -> bool {
    self.at_top
  }

  /// Whether the comment text carries any copyright marker.
  pub fn is_copyright(&self) -> bool {
    is_copyright_text(&self.contents)
  }
}

/// A file's content together with the comment layout of its category.
///
/// The path is only an identifier; the file is never reopened through it.
#[derive(Debug, Clone)]
pub struct SourceFile {
  path: PathBuf,
  text: String,
  category: FileCategory,
  format: CommentFormat,
}

impl SourceFile {
  pub fn new(path: impl Into<PathBuf>, text: String, category: FileCategory) -> Self {
    Self {
      path: path.into(),
      text,
      category,
      format: category.format(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub const fn category(&self) -> FileCategory {
    self.category
  }

  pub const fn format(&self) -> &CommentFormat {
    &self.format
  }

  /// All block comments in file order.
  pub fn comments(&self) -> Vec<BlockComment> {
    scan_all(&self.text, self.format.syntax, self.format.allows_shebang)
  }

  /// The first block comment carrying a copyright marker, if any.
  pub fn first_copyright_comment(&self) -> Option<BlockComment> {
    self.comments().into_iter().find(BlockComment::is_copyright)
  }

  /// Number of block comments carrying a copyright marker.
  pub fn count_copyright_comments(&self) -> usize {
    count_copyright_comments(&self.text, self.format.syntax, self.format.allows_shebang)
  }

  pub fn has_multiple_copyrights(&self) -> bool {
    self.count_copyright_comments() > 1
  }

  /// Offset at which a new header is inserted: the start of the file, or just
  /// after a shebang line where the category allows one.
  pub fn insertion_offset(&self) -> usize {
    if self.format.allows_shebang && self.text.starts_with("#!") {
      return self.text.find('\n').map_or(self.text.len(), |pos| pos + 1);
    }
    0
  }

  /// Newline used when rendering: `\r\n` if the file already uses it,
  /// otherwise the platform convention.
  pub fn newline(&self) -> &'static str {
    detect_newline(&self.text)
  }
}

/// Finds the first block comment in `text`.
pub fn scan(text: &str, syntax: CommentSyntax, allows_shebang: bool) -> Option<BlockComment> {
  scan_all(text, syntax, allows_shebang).into_iter().next()
}

/// Finds every block comment in `text`, in file order.
pub fn scan_all(text: &str, syntax: CommentSyntax, allows_shebang: bool) -> Vec<BlockComment> {
  let spans = match syntax {
    CommentSyntax::Block { start, end } => block_spans(text, start, end),
    CommentSyntax::Line { prefix } => line_spans(&lines_with_offsets(text), prefix),
  };

  spans
    .into_iter()
    .map(|span| BlockComment {
      start: span.start,
      end: span.end,
      contents: text[span.clone()].to_string(),
      at_top: is_at_top(text, span.start, allows_shebang),
    })
    .collect()
}

/// Counts block comments whose text carries a copyright marker.
pub fn count_copyright_comments(text: &str, syntax: CommentSyntax, allows_shebang: bool) -> usize {
  scan_all(text, syntax, allows_shebang)
    .iter()
    .filter(|comment| comment.is_copyright())
    .count()
}

/// Case-insensitive check for any of the copyright marker tokens.
pub fn is_copyright_text(text: &str) -> bool {
  let lower = text.to_lowercase();
  COPYRIGHT_MARKERS.iter().any(|marker| lower.contains(marker))
}

pub fn detect_newline(text: &str) -> &'static str {
  if text.contains("\r\n") {
    "\r\n"
  } else if text.contains('\n') || !cfg!(windows) {
    "\n"
  } else {
    "\r\n"
  }
}

/// Splits text into lines, keeping each line's byte offset. Line text excludes
/// the `\n` and any trailing `\r`.
fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
  let mut lines = Vec::new();
  let mut offset = 0;
  for raw in text.split_inclusive('\n') {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    let line = line.strip_suffix('\r').unwrap_or(line);
    lines.push((offset, line));
    offset += raw.len();
  }
  lines
}

/// `*` runs are banner decoration; an end token made only of them cannot be
/// told apart from the opening banner.
fn is_decoration(token: &str) -> bool {
  token.chars().all(|c| c == '*')
}

fn block_spans(text: &str, start: &str, end: &str) -> Vec<Range<usize>> {
  let mut spans = Vec::new();
  let decorative_end = is_decoration(end);
  let mut cursor = 0;

  while let Some(pos) = text[cursor..].find(start) {
    let comment_start = cursor + pos;
    let after_start = comment_start + start.len();

    // A `**` end would match the opening banner, so it is only looked for
    // from the next line on.
    let search_from = if decorative_end {
      match text[after_start..].find('\n') {
        Some(newline) => after_start + newline + 1,
        None => break,
      }
    } else {
      after_start
    };

    let Some(found) = text[search_from..].find(end) else {
      // Unterminated comment: nothing after it can be a comment either.
      break;
    };
    let mut comment_end = search_from + found + end.len();
    if decorative_end {
      let rest = &text[comment_end..];
      comment_end += rest.len() - rest.trim_start_matches('*').len();
    }

    spans.push(comment_start..comment_end);
    cursor = comment_end;
  }

  spans
}

fn line_spans(lines: &[(usize, &str)], prefix: &str) -> Vec<Range<usize>> {
  let mut spans = Vec::new();
  let mut index = 0;

  while index < lines.len() {
    let (offset, line) = lines[index];
    if !starts_with_prefix(line, prefix) {
      index += 1;
      continue;
    }

    let comment_start = offset + (line.len() - line.trim_start().len());
    let mut last = index;
    let mut seen_copyright = is_copyright_text(line);
    while last + 1 < lines.len() && starts_with_prefix(lines[last + 1].1, prefix) {
      last += 1;
      let current = lines[last].1;
      if seen_copyright && is_banner(current, prefix) {
        break;
      }
      seen_copyright |= is_copyright_text(current);
    }

    let (last_offset, last_line) = lines[last];
    spans.push(comment_start..last_offset + last_line.len());
    index = last + 1;
  }

  spans
}

/// A prefixed line holding nothing but a run of `*`, `#`, `=` or `-`.
fn is_banner(line: &str, prefix: &str) -> bool {
  let rest = line.trim().get(prefix.len()..).unwrap_or_default().trim();
  rest.len() >= 3 && rest.chars().all(|c| matches!(c, '*' | '#' | '=' | '-'))
}

/// Case-insensitive prefix test. Alphabetic prefixes such as `rem` must be
/// followed by a non-alphanumeric character so `remove` does not match.
fn starts_with_prefix(line: &str, prefix: &str) -> bool {
  let trimmed = line.trim_start();
  let Some(head) = trimmed.get(..prefix.len()) else {
    return false;
  };
  if !head.eq_ignore_ascii_case(prefix) {
    return false;
  }
  if !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
    return true;
  }
  trimmed[prefix.len()..]
    .chars()
    .next()
    .is_none_or(|c| !c.is_alphanumeric())
}

fn is_at_top(text: &str, start: usize, allows_shebang: bool) -> bool {
  let before = &text[..start];
  if before.trim().is_empty() {
    return true;
  }
  if allows_shebang && before.starts_with("#!") {
    let after_shebang = before.find('\n').map_or("", |pos| &before[pos + 1..]);
    return after_shebang.trim().is_empty();
  }
  false
}
