//! # File Types Module
//!
//! This module maps file extensions to a [`FileCategory`] and each category to
//! the comment syntax and banner layout its copyright header uses.
//!
//! The mapping is a plain data table: categories differ only in their comment
//! delimiters, so there is no per-language behaviour to dispatch on.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::verbose_log;

/// Width of the `*`/`#` run that makes up a header banner line.
const BANNER_WIDTH: usize = 79;

/// Language category of a source file, as far as copyright headers go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCategory {
  /// Java and C-family sources using `/* ... */`
  Source,
  /// Java properties files using `#` line comments
  Properties,
  /// Shell scripts and makefiles using a `#*` ... `**` banner block
  ShellMake,
  /// Windows batch files using `rem` line comments
  Batch,
}

impl std::fmt::Display for FileCategory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FileCategory::Source => write!(f, "source"),
      FileCategory::Properties => write!(f, "properties"),
      FileCategory::ShellMake => write!(f, "shell-make"),
      FileCategory::Batch => write!(f, "batch"),
    }
  }
}

/// How comments are delimited for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSyntax {
  /// A delimited span; the first `end` after `start` closes it (no nesting).
  Block {
    start: &'static str,
    end: &'static str,
  },
  /// A run of consecutive lines that each begin with `prefix`.
  Line { prefix: &'static str },
}

/// Full comment layout for a category: how to find comments and how to
/// render a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFormat {
  /// Delimiters used when scanning
  pub syntax: CommentSyntax,
  /// First line of a rendered header
  pub top: String,
  /// Prefix for each text line of a rendered header
  pub middle: String,
  /// Prefix used for an empty line inside a rendered header
  pub blank: String,
  /// Last line of a rendered header
  pub bottom: String,
  /// Whether a `#!` first line may precede the header
  pub allows_shebang: bool,
}

impl FileCategory {
  /// Returns the comment layout for this category.
  pub fn format(self) -> CommentFormat {
    let stars = "*".repeat(BANNER_WIDTH);
    match self {
      FileCategory::Source => CommentFormat {
        syntax: CommentSyntax::Block { start: "/*", end: "*/" },
        top: format!("/{stars}"),
        middle: " * ".to_string(),
        blank: " *".to_string(),
        bottom: format!(" {stars}/"),
        allows_shebang: false,
      },
      FileCategory::ShellMake => CommentFormat {
        syntax: CommentSyntax::Block { start: "#*", end: "**" },
        top: format!("#{stars}"),
        middle: "# ".to_string(),
        blank: "#".to_string(),
        bottom: format!("#{stars}"),
        allows_shebang: true,
      },
      FileCategory::Properties => CommentFormat {
        syntax: CommentSyntax::Line { prefix: "#" },
        top: "#".repeat(BANNER_WIDTH),
        middle: "# ".to_string(),
        blank: "#".to_string(),
        bottom: "#".repeat(BANNER_WIDTH),
        allows_shebang: false,
      },
      FileCategory::Batch => CommentFormat {
        syntax: CommentSyntax::Line { prefix: "rem" },
        top: format!("rem {stars}"),
        middle: "rem ".to_string(),
        blank: "rem".to_string(),
        bottom: format!("rem {stars}"),
        allows_shebang: false,
      },
    }
  }
}

/// Outcome of classifying a path by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  /// The extension maps to a known category
  Known(FileCategory),
  /// The file name has no extension at all
  NoExtension,
  /// The extension is not in the table
  Unknown,
}

/// Built-in extension table.
const BUILTIN_EXTENSIONS: &[(&str, FileCategory)] = &[
  ("java", FileCategory::Source),
  ("c", FileCategory::Source),
  ("h", FileCategory::Source),
  ("rc", FileCategory::Source),
  ("cc", FileCategory::Source),
  ("cpp", FileCategory::Source),
  ("properties", FileCategory::Properties),
  ("sh", FileCategory::ShellMake),
  ("csh", FileCategory::ShellMake),
  ("mak", FileCategory::ShellMake),
  ("bat", FileCategory::Batch),
];

/// Extension to category lookup, with user overrides layered over the
/// built-in table.
#[derive(Debug, Clone, Default)]
pub struct FileTypeTable {
  overrides: HashMap<String, FileCategory>,
}

impl FileTypeTable {
  /// Creates a table with only the built-in mappings.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a table where `overrides` (extension without leading dot) take
  /// precedence over the built-in mappings.
  pub fn with_overrides(overrides: HashMap<String, FileCategory>) -> Self {
    let overrides = overrides.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
    Self { overrides }
  }

  /// Classifies a path by its (case-insensitive) extension.
  pub fn classify(&self, path: &Path) -> Classification {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
      return Classification::NoExtension;
    };
    let extension = extension.to_lowercase();

    if let Some(category) = self.overrides.get(&extension) {
      verbose_log!("Using configured category {} for .{}", category, extension);
      return Classification::Known(*category);
    }

    BUILTIN_EXTENSIONS
      .iter()
      .find(|(ext, _)| *ext == extension)
      .map_or(Classification::Unknown, |(_, category)| Classification::Known(*category))
  }
}
