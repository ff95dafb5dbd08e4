//! # Configuration Module
//!
//! This module provides configuration support for fixcopyright, allowing
//! users to set the rewrite policy, the header boilerplate, extra extension
//! mappings and history ignore hints.
//!
//! Configuration can be specified in a `.fixcopyright.toml` file or via the
//! `FIXCOPYRIGHT_CONFIG` environment variable. Command-line flags override
//! the file; the resulting [`Policy`] is built once per run and never mutated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::boilerplate::Boilerplate;
use crate::file_types::FileCategory;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".fixcopyright.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "FIXCOPYRIGHT_CONFIG";

/// What to do when a file's last-modified year cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedYear {
  /// Use the configured default revision year
  #[default]
  Default,
  /// Leave the file unchanged and warn
  Skip,
}

/// `[policy]` section.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PolicyConfig {
  #[serde(default)]
  pub replace_all_existing: bool,

  #[serde(default)]
  pub ignore_properties_files: bool,

  #[serde(default)]
  pub use_fixed_revision_year: bool,

  /// Defaults to the current year.
  #[serde(default)]
  pub fixed_revision_year: Option<i32>,

  /// Defaults to the current year.
  #[serde(default)]
  pub default_revision_year: Option<i32>,

  #[serde(default)]
  pub unresolved_year: UnresolvedYear,

  #[serde(default)]
  pub preserve_foreign_licenses: Option<bool>,
}

/// `[header]` section. Missing fields fall back to the built-in boilerplate.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct HeaderConfig {
  #[serde(default)]
  pub holder: Option<String>,

  /// License statement, one entry per rendered line.
  #[serde(default)]
  pub license: Option<Vec<String>>,

  #[serde(default)]
  pub default_contributor: Option<String>,
}

/// `[history]` section.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct HistoryConfig {
  /// Commit message substrings marking a commit that should not count as a
  /// content change.
  #[serde(default)]
  pub ignore_messages: Vec<String>,
}

/// Main configuration struct for fixcopyright.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub policy: PolicyConfig,

  #[serde(default)]
  pub header: HeaderConfig,

  /// Extra extension mappings. Keys are extensions without the leading dot.
  #[serde(default)]
  pub extensions: HashMap<String, FileCategory>,

  #[serde(default)]
  pub history: HistoryConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// An extension mapping is invalid.
  #[error("Invalid extension mapping '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },

  /// A year setting is out of range.
  #[error("Invalid {field}: {year} is not a four-digit year")]
  InvalidYear { field: &'static str, year: i32 },

  /// A year setting lies after the current year.
  #[error("Invalid {field}: {year} is after the current year {current_year}")]
  FutureYear {
    field: &'static str,
    year: i32,
    current_year: i32,
  },

  /// The header boilerplate is unusable.
  #[error("Invalid header {field}: {message}")]
  InvalidHeader { field: &'static str, message: String },
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let config = config.normalize();

    verbose_log!("Loaded {} extension mappings", config.extensions.len());

    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    for ext in self.extensions.keys() {
      if ext.is_empty() {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "extension cannot be empty".to_string(),
        });
      }
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }
    }

    if let Some(year) = self.policy.fixed_revision_year {
      validate_year("fixed-revision-year", year)?;
    }
    if let Some(year) = self.policy.default_revision_year {
      validate_year("default-revision-year", year)?;
    }

    if let Some(holder) = &self.header.holder
      && holder.trim().is_empty()
    {
      return Err(ConfigError::InvalidHeader {
        field: "holder",
        message: "holder cannot be empty".to_string(),
      });
    }
    if let Some(license) = &self.header.license
      && license.iter().all(|line| line.trim().is_empty())
    {
      return Err(ConfigError::InvalidHeader {
        field: "license",
        message: "license must have at least one non-empty line".to_string(),
      });
    }

    Ok(())
  }

  /// Lowercase extension keys so lookups are case-insensitive.
  fn normalize(self) -> Self {
    let extensions = self.extensions.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect();
    Self { extensions, ..self }
  }

  /// The header boilerplate, with configured fields replacing the defaults.
  pub fn boilerplate(&self) -> Boilerplate {
    let mut boilerplate = Boilerplate::default();
    if let Some(holder) = &self.header.holder {
      boilerplate.holder = holder.trim().to_string();
    }
    if let Some(license) = &self.header.license {
      boilerplate.license = license.clone();
    }
    if let Some(contributor) = &self.header.default_contributor {
      boilerplate.default_contributor = contributor.clone();
    }
    boilerplate
  }
}

fn validate_year(field: &'static str, year: i32) -> Result<(), ConfigError> {
  if (1000..=9999).contains(&year) {
    Ok(())
  } else {
    Err(ConfigError::InvalidYear { field, year })
  }
}

/// A stamped year later than `current_year` would not parse back as a header.
fn validate_policy_year(field: &'static str, year: i32, current_year: i32) -> Result<(), ConfigError> {
  validate_year(field, year)?;
  if year > current_year {
    return Err(ConfigError::FutureYear {
      field,
      year,
      current_year,
    });
  }
  Ok(())
}

/// Policy values given on the command line. `None` keeps the config value.
#[derive(Debug, Default, Clone)]
pub struct PolicyOverrides {
  pub replace_all: Option<bool>,
  pub ignore_properties_files: Option<bool>,
  /// Setting a fixed year also turns fixed-year mode on.
  pub fixed_revision_year: Option<i32>,
  pub default_revision_year: Option<i32>,
  pub unresolved_year: Option<UnresolvedYear>,
  pub preserve_foreign_licenses: Option<bool>,
}

/// Behavioural flags for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
  pub replace_all: bool,
  pub ignore_properties_files: bool,
  pub use_fixed_revision_year: bool,
  pub fixed_revision_year: i32,
  pub default_revision_year: i32,
  pub unresolved_year: UnresolvedYear,
  pub preserve_foreign_licenses: bool,
}

impl Policy {
  /// Policy with every flag off and both years set to `current_year`.
  pub fn defaults(current_year: i32) -> Self {
    Self {
      replace_all: false,
      ignore_properties_files: false,
      use_fixed_revision_year: false,
      fixed_revision_year: current_year,
      default_revision_year: current_year,
      unresolved_year: UnresolvedYear::Default,
      preserve_foreign_licenses: true,
    }
  }

  /// Builds the run's policy from the config file (if any) and command-line
  /// overrides.
  pub fn resolve(config: Option<&Config>, overrides: &PolicyOverrides, current_year: i32) -> Result<Self, ConfigError> {
    let file = config.map(|c| c.policy.clone()).unwrap_or_default();
    let defaults = Self::defaults(current_year);

    let policy = Self {
      replace_all: overrides.replace_all.unwrap_or(file.replace_all_existing),
      ignore_properties_files: overrides
        .ignore_properties_files
        .unwrap_or(file.ignore_properties_files),
      use_fixed_revision_year: overrides.fixed_revision_year.is_some() || file.use_fixed_revision_year,
      fixed_revision_year: overrides
        .fixed_revision_year
        .or(file.fixed_revision_year)
        .unwrap_or(defaults.fixed_revision_year),
      default_revision_year: overrides
        .default_revision_year
        .or(file.default_revision_year)
        .unwrap_or(defaults.default_revision_year),
      unresolved_year: overrides.unresolved_year.unwrap_or(file.unresolved_year),
      preserve_foreign_licenses: overrides
        .preserve_foreign_licenses
        .or(file.preserve_foreign_licenses)
        .unwrap_or(defaults.preserve_foreign_licenses),
    };

    validate_policy_year("fixed revision year", policy.fixed_revision_year, current_year)?;
    validate_policy_year("default revision year", policy.default_revision_year, current_year)?;

    verbose_log!("Policy: {:?}", policy);
    Ok(policy)
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `FIXCOPYRIGHT_CONFIG` environment variable
/// 3. `.fixcopyright.toml` in the workspace root
pub fn discover_config_path(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let workspace_config = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if workspace_config.exists() {
    verbose_log!("Using workspace config: {}", workspace_config.display());
    return Some(workspace_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `Ok(None)` when `no_config` is set or no file is found.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, workspace_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_full_config() {
    let config_content = concat!(
      "[policy]\n",
      "replace-all-existing = true\n",
      "ignore-properties-files = true\n",
      "use-fixed-revision-year = true\n",
      "fixed-revision-year = 2021\n",
      "unresolved-year = \"skip\"\n",
      "preserve-foreign-licenses = false\n",
      "\n",
      "[header]\n",
      "holder = \"Acme Corp\"\n",
      "license = [\"All rights reserved.\"]\n",
      "\n",
      "[extensions]\n",
      "js = \"source\"\n",
      "ksh = \"shell-make\"\n",
      "\n",
      "[history]\n",
      "ignore-messages = [\"[bulk]\"]\n",
    );

    let config: Config = toml::from_str(config_content).expect("valid config should parse");

    assert!(config.policy.replace_all_existing);
    assert!(config.policy.ignore_properties_files);
    assert_eq!(config.policy.fixed_revision_year, Some(2021));
    assert_eq!(config.policy.unresolved_year, UnresolvedYear::Skip);
    assert_eq!(config.policy.preserve_foreign_licenses, Some(false));
    assert_eq!(config.extensions.get("js"), Some(&FileCategory::Source));
    assert_eq!(config.extensions.get("ksh"), Some(&FileCategory::ShellMake));
    assert_eq!(config.history.ignore_messages, vec!["[bulk]".to_string()]);

    let boilerplate = config.boilerplate();
    assert_eq!(boilerplate.holder, "Acme Corp");
    assert_eq!(boilerplate.license, vec!["All rights reserved.".to_string()]);
    assert_eq!(boilerplate.default_contributor, Boilerplate::default().default_contributor);
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert!(config.extensions.is_empty());
    assert_eq!(config.boilerplate(), Boilerplate::default());
  }

  #[test]
  fn test_unknown_category_rejected() {
    let result: Result<Config, _> = toml::from_str("[extensions]\njs = \"javascript\"\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_validate_leading_dot() {
    let mut config = Config::default();
    config.extensions.insert(".js".to_string(), FileCategory::Source);

    let err = config.validate().expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidExtension { .. }));
  }

  #[test]
  fn test_validate_year_range() {
    let mut config = Config::default();
    config.policy.default_revision_year = Some(99);

    let err = config.validate().expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidYear { year: 99, .. }));
  }

  #[test]
  fn test_validate_empty_holder() {
    let mut config = Config::default();
    config.header.holder = Some("  ".to_string());

    let err = config.validate().expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidHeader { field: "holder", .. }));
  }

  #[test]
  fn test_policy_defaults_without_config() {
    let policy = Policy::resolve(None, &PolicyOverrides::default(), 2025).expect("policy");
    assert_eq!(policy, Policy::defaults(2025));
    assert!(policy.preserve_foreign_licenses);
  }

  #[test]
  fn test_policy_overrides_beat_config() {
    let mut config = Config::default();
    config.policy.replace_all_existing = true;
    config.policy.default_revision_year = Some(2010);
    config.policy.unresolved_year = UnresolvedYear::Skip;

    let overrides = PolicyOverrides {
      replace_all: Some(false),
      fixed_revision_year: Some(2019),
      unresolved_year: Some(UnresolvedYear::Default),
      ..PolicyOverrides::default()
    };

    let policy = Policy::resolve(Some(&config), &overrides, 2025).expect("policy");
    assert!(!policy.replace_all);
    assert!(policy.use_fixed_revision_year);
    assert_eq!(policy.fixed_revision_year, 2019);
    assert_eq!(policy.default_revision_year, 2010);
    assert_eq!(policy.unresolved_year, UnresolvedYear::Default);
  }

  #[test]
  fn test_policy_rejects_bad_override_year() {
    let overrides = PolicyOverrides {
      default_revision_year: Some(12345),
      ..PolicyOverrides::default()
    };
    assert!(Policy::resolve(None, &overrides, 2025).is_err());
  }

  #[test]
  fn test_policy_rejects_year_after_current_year() {
    let overrides = PolicyOverrides {
      fixed_revision_year: Some(2030),
      ..PolicyOverrides::default()
    };
    let err = Policy::resolve(None, &overrides, 2025).expect_err("future fixed year");
    assert!(matches!(err, ConfigError::FutureYear { year: 2030, current_year: 2025, .. }));

    let mut config = Config::default();
    config.policy.default_revision_year = Some(2026);
    let err = Policy::resolve(Some(&config), &PolicyOverrides::default(), 2025).expect_err("future default year");
    assert!(matches!(err, ConfigError::FutureYear { year: 2026, .. }));

    let overrides = PolicyOverrides {
      fixed_revision_year: Some(2025),
      ..PolicyOverrides::default()
    };
    assert!(Policy::resolve(None, &overrides, 2025).is_ok());
  }

  #[test]
  fn test_load_config_from_file_normalizes_extensions() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "[extensions]\nJS = \"source\"\n").expect("write config");

    let config = Config::load(&config_path).expect("load should succeed");
    assert!(config.extensions.contains_key("js"));
    assert!(!config.extensions.contains_key("JS"));
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = Config::load(Path::new("/nonexistent/path/.fixcopyright.toml"));
    assert!(matches!(
      result.expect_err("should fail"),
      ConfigError::ReadError { .. }
    ));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom-config.toml");
    std::fs::write(&config_path, "").expect("write config");

    let result = discover_config_path(Some(&config_path), temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_discover_config_workspace_root() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "").expect("write config");

    assert_eq!(discover_config_path(None, temp_dir.path()), Some(config_path));
  }

  #[test]
  fn test_load_config_disabled() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "not = [valid").expect("write config");

    assert!(load_config(None, temp_dir.path(), true).expect("disabled").is_none());
    assert!(load_config(None, temp_dir.path(), false).is_err());
  }
}
