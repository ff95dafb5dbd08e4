//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing.

mod fix;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
pub use fix::{FixArgs, run_fix};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Version plus the commit it was built from, shown by `--version`.
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FIXCOPYRIGHT_BUILD"), ")");

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  long_version = LONG_VERSION,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Report which headers would change, without modifying files
  fixcopyright src/

  # Insert missing headers and update stale revision years
  fixcopyright --modify src/ include/

  # Show the planned changes as a diff
  fixcopyright --show-diff \"src/**/*.java\"

  # Stamp a fixed revision year on every changed header
  fixcopyright --modify --fixed-year 2024 .

  # Regenerate every header from the boilerplate
  fixcopyright --modify --replace-all src/

  # Write the warning log and a JSON report elsewhere
  fixcopyright --log-file /tmp/copyright.log --report-json report.json .

  # Ignore specific files or patterns
  fixcopyright --ignore \"**/thirdparty/**\" --ignore \"*.bat\" .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(flatten)]
  pub fix_args: FixArgs,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

