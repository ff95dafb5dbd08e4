//! # Fix Command
//!
//! This module implements the fix command: it selects files, plans a header
//! change for each one and, with `--modify`, writes the changes. This is the
//! only command and runs when no subcommand is given.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Args;
use fixcopyright::config::{Policy, PolicyOverrides, UnresolvedYear, load_config};
use fixcopyright::diff::DiffManager;
use fixcopyright::engine::Engine;
use fixcopyright::file_types::FileTypeTable;
use fixcopyright::git::GitYearResolver;
use fixcopyright::history::{IgnoreHints, NoHistory, YearResolver};
use fixcopyright::ignore::IgnoreManager;
use fixcopyright::info_log;
use fixcopyright::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use fixcopyright::output::{
  print_blank_line, print_changed_files, print_done, print_hint, print_start_message, print_summary,
  print_warning_log,
};
use fixcopyright::processor::{CancellationToken, FileCollector, Processor, ProcessorConfig, RunContext};
use fixcopyright::report::{RunSummary, write_json};
use fixcopyright::workspace::{Workspace, resolve_workspace};
use tracing::{debug, warn};

/// Default name of the warning log, written to the workspace root.
pub const DEFAULT_LOG_FILENAME: &str = "copyrightLog.txt";

/// Arguments for the fix command
#[derive(Args, Debug, Default)]
pub struct FixArgs {
  /// File, directory or glob patterns to process. Directories are processed
  /// recursively.
  #[arg(required = false)]
  pub patterns: Vec<String>,

  /// Path to config file (default: .fixcopyright.toml in workspace root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Dry run mode: only report planned changes without modifying files
  /// (default)
  #[arg(long, group = "mode", hide = true)]
  pub dry_run: bool,

  /// Modify mode: insert or rewrite copyright headers in files
  #[arg(
    long,
    group = "mode",
    help = "Modify mode: insert or rewrite copyright headers in files

[default: --dry-run]"
  )]
  pub modify: bool,

  /// Show diff of planned changes
  #[arg(long)]
  pub show_diff: bool,

  /// Save diff of planned changes to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// File patterns to ignore (supports gitignore-style globs)
  #[arg(long, short = 'i')]
  pub ignore: Vec<String>,

  /// Replace every existing header with a freshly generated one
  #[arg(long)]
  pub replace_all: bool,

  /// Skip .properties files
  #[arg(long)]
  pub ignore_properties: bool,

  /// Stamp this revision year on every changed header instead of asking git
  #[arg(long, value_name = "YEAR")]
  pub fixed_year: Option<i32>,

  /// Revision year used when the last change of a file cannot be determined
  #[arg(long, value_name = "YEAR")]
  pub default_year: Option<i32>,

  /// What to do when the last change of a file cannot be determined
  #[arg(long, value_name = "MODE", value_enum)]
  pub unresolved_year: Option<UnresolvedYear>,

  /// Rewrite headers that mention GPL, MPL or Apple licenses instead of
  /// keeping their original text
  #[arg(long)]
  pub no_preserve_foreign: bool,

  /// Year treated as the current year
  #[arg(long, value_name = "YEAR", hide = true)]
  pub current_year: Option<i32>,

  /// Do not consult git history; every year is unresolved
  #[arg(long)]
  pub no_history: bool,

  /// Where to write the warning log (default: copyrightLog.txt in the
  /// workspace root)
  #[arg(long, value_name = "FILE")]
  pub log_file: Option<PathBuf>,

  /// Generate a JSON report of per-file outcomes and save to the specified
  /// path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except the warning log and errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl FixArgs {
  /// Validate the arguments and return an error if invalid
  fn validate(&self) -> Result<(), String> {
    if self.patterns.is_empty() {
      return Err("Missing required argument: <PATTERNS>...".to_string());
    }
    Ok(())
  }

  fn policy_overrides(&self) -> PolicyOverrides {
    PolicyOverrides {
      replace_all: self.replace_all.then_some(true),
      ignore_properties_files: self.ignore_properties.then_some(true),
      fixed_revision_year: self.fixed_year,
      default_revision_year: self.default_year,
      unresolved_year: self.unresolved_year,
      preserve_foreign_licenses: self.no_preserve_foreign.then_some(false),
    }
  }
}

/// Run the fix command with the given arguments
pub async fn run_fix(args: FixArgs) -> Result<()> {
  if let Err(e) = args.validate() {
    eprintln!("ERROR: {e}");
    process::exit(1);
  }

  init_tracing(args.quiet, args.verbose);

  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  let current_dir = current_dir.canonicalize().unwrap_or(current_dir);
  let current_year = args.current_year.unwrap_or_else(|| chrono::Local::now().year());
  let check_only = args.dry_run || !args.modify;

  let workspace = resolve_workspace(&current_dir, &args.patterns)?;
  let workspace_root = workspace.root().to_path_buf();
  debug!("Using workspace root: {}", workspace_root.display());

  let config = load_config(args.config.as_deref(), &workspace_root, args.no_config)?;
  let policy = Policy::resolve(config.as_ref(), &args.policy_overrides(), current_year)?;
  let boilerplate = config.as_ref().map(|c| c.boilerplate()).unwrap_or_default();
  let file_types = config
    .as_ref()
    .map(|c| FileTypeTable::with_overrides(c.extensions.clone()))
    .unwrap_or_default();
  let ignore_messages = config
    .as_ref()
    .map(|c| c.history.ignore_messages.clone())
    .unwrap_or_default();

  let history = open_history(&workspace, args.no_history, ignore_messages);

  let diff_manager = DiffManager::new(args.show_diff, args.save_diff.clone());
  diff_manager.init()?;

  let mut ignore = IgnoreManager::new(&workspace_root, &args.ignore)?;
  ignore.load_ignore_file()?;
  let files = FileCollector::new(current_dir).collect(&args.patterns, &ignore)?;
  let selected = files.len();

  print_start_message(selected, check_only);

  let start_time = Instant::now();

  let processor = Processor::new(ProcessorConfig {
    engine: Engine::new(policy, boilerplate, current_year),
    file_types,
    history,
    workspace_root: workspace_root.clone(),
    check_only,
    diff_manager: diff_manager.is_enabled().then_some(diff_manager),
  });

  let cancel = CancellationToken::new();
  let listener = {
    let cancel = cancel.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        warn!("Interrupted, finishing the current file");
        cancel.cancel();
      }
    })
  };

  let context = RunContext::new(cancel);
  let (outcome, context) = tokio::task::spawn_blocking(move || {
    let outcome = processor.run(files, &context);
    (outcome, context)
  })
  .await
  .with_context(|| "File processing task failed")?;
  listener.abort();

  let elapsed = start_time.elapsed();

  let log_path = args
    .log_file
    .clone()
    .unwrap_or_else(|| workspace_root.join(DEFAULT_LOG_FILENAME));
  context.warnings.write_to(&log_path)?;
  debug!("Wrote warning log to {}", log_path.display());

  print_blank_line();
  print_warning_log(&context.warnings);
  print_blank_line();

  print_changed_files(&outcome.reports, check_only);

  let summary = RunSummary::from_reports(selected, &outcome.reports, check_only, outcome.cancelled, elapsed);
  print_blank_line();
  print_summary(&summary);
  print_done(elapsed);

  if let Some(ref output_path) = args.report_json {
    if let Err(e) = write_json(output_path, &outcome.reports, &summary) {
      eprintln!("Error generating JSON report: {:#}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  if let Some(code) = exit_code(check_only, &summary) {
    if code == EXIT_PENDING_CHANGES {
      print_blank_line();
      print_hint("Run with --modify to write the planned header changes.");
    }
    process::exit(code);
  }

  Ok(())
}

const EXIT_PENDING_CHANGES: i32 = 1;
const EXIT_CANCELLED: i32 = 130;

/// Non-zero exit status for a finished run. Cancellation takes precedence
/// over pending dry-run changes.
fn exit_code(check_only: bool, summary: &RunSummary) -> Option<i32> {
  if summary.cancelled {
    Some(EXIT_CANCELLED)
  } else if check_only && summary.changed() > 0 {
    Some(EXIT_PENDING_CHANGES)
  } else {
    None
  }
}

fn open_history(
  workspace: &Workspace,
  no_history: bool,
  ignore_messages: Vec<String>,
) -> Arc<dyn YearResolver> {
  if no_history {
    debug!("History lookups disabled (--no-history)");
    return Arc::new(NoHistory);
  }
  if !workspace.is_git() {
    info_log!("No git repository found; revision years fall back to the unresolved-year policy");
    return Arc::new(NoHistory);
  }

  match GitYearResolver::open(workspace.root(), IgnoreHints::new(ignore_messages)) {
    Ok(resolver) => Arc::new(resolver),
    Err(e) => {
      warn!("Git history unavailable: {}", e);
      Arc::new(NoHistory)
    }
  }
}
