//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads a file as UTF-8 text.
  pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    String::from_utf8(bytes).with_context(|| format!("File is not valid UTF-8: {}", path.display()))
  }

  /// Replaces a file's content.
  pub fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}
