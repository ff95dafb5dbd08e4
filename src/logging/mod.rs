//! # Logging Module
//!
//! This module provides logging utilities for fixcopyright, including:
//! - Verbose logging that can be enabled/disabled
//! - Standard info logging with color support
//! - The `tracing` subscriber used for structured diagnostics
//!
//! Verbose logs go to stderr and info logs go to stdout, so the log echo and
//! summary can be piped separately from diagnostics.
//!
//! ## Example
//!
//! ```rust
//! use fixcopyright::logging::{ColorMode, set_verbose};
//! use fixcopyright::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Processing file: {}", "Foo.java");
//! info_log!("Resources selected: {}", 1);
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message, highlighted when colors are enabled.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
