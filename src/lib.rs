//! # fixcopyright
//!
//! A tool that keeps the copyright header comment at the top of source files
//! consistent with a fixed boilerplate and with each file's revision history.
//!
//! For every selected file `fixcopyright` finds the leading block comment,
//! parses any copyright header it contains, asks git for the year the file
//! last changed and then either leaves the file alone, inserts a new header
//! or rewrites the existing one. Problems are collected per category into a
//! warning log instead of stopping the batch.
//!
//! ## Features
//!
//! * Comment scanning for Java/C-family, properties, shell/make and batch files
//! * Parsing of creation year, revision year and contributors from existing headers
//! * Revision years taken from git history, skipping copyright-stamping commits
//! * Dry-run mode (the default) with optional unified diffs of planned changes
//! * Warning log grouped by category, plus an optional JSON report
//!
//! ## Usage as a Library
//!
//! ```rust
//! use fixcopyright::boilerplate::Boilerplate;
//! use fixcopyright::config::Policy;
//! use fixcopyright::engine::Engine;
//! use fixcopyright::file_types::FileCategory;
//! use fixcopyright::history::{FixedHistory, LastModified};
//! use fixcopyright::scanner::SourceFile;
//!
//! let engine = Engine::new(Policy::defaults(2025), Boilerplate::default(), 2025);
//! let history = FixedHistory::new().with("Foo.java", LastModified::Year(2024));
//!
//! let file = SourceFile::new("Foo.java", "class Foo {}\n".to_string(), FileCategory::Source);
//! let decision = engine.plan(&file, &history);
//!
//! let updated = decision.action.apply(file.text());
//! assert!(updated.contains("Copyright (c) 2024"));
//! assert!(updated.ends_with("class Foo {}\n"));
//! ```
//!
//! ## Modules
//!
//! * [`scanner`] - Locating block comments in file text
//! * [`copyright`] - Parsing and rendering copyright headers
//! * [`rewrite`] - Deciding and applying the change for one file
//! * [`engine`] - Per-file planning on top of a history resolver
//! * [`processor`] - Batch driver over a selection of files
//!
//! [`scanner`]: crate::scanner
//! [`copyright`]: crate::copyright
//! [`rewrite`]: crate::rewrite
//! [`engine`]: crate::engine
//! [`processor`]: crate::processor

pub mod boilerplate;
pub mod config;
pub mod copyright;
pub mod diff;
pub mod engine;
pub mod file_types;
pub mod git;
pub mod history;
pub mod ignore;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod rewrite;
pub mod scanner;
pub mod warnings;
pub mod workspace;
