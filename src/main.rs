//! # fixcopyright
//!
//! Command-line entry point: inserts and updates copyright header comments.

mod cli;

use anyhow::Result;
use tracing::debug;

use crate::cli::{Cli, run_fix};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse_args();

  let result = run_fix(cli.fix_args).await;
  debug!("fixcopyright {}", cli::LONG_VERSION);
  result
}
