use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Represents the complete configuration for release-sync.
///
/// Contains commit classification settings, version cleaning, the
/// manifest targets to rewrite and the changelog location.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// Returns the default commit types that produce a minor release.
fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

/// Returns the default commit types that produce a patch release.
fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string(), "perf".to_string()]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Configuration for conventional commit classification.
///
/// Commit types listed in neither `minor_types` nor `patch_types` do not
/// trigger a release on their own.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
        }
    }
}

/// How a version string is normalized before it is written.
///
/// In TOML: `clean = "standard"`, `clean = "identity"` or
/// `clean = { strip = "-beta" }`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CleanConfig {
    #[default]
    Standard,
    Identity,
    Strip(String),
}

fn default_initial_version() -> String {
    "0.0.0".to_string()
}

/// Configuration for version computation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionConfig {
    #[serde(default)]
    pub clean: CleanConfig,

    /// Version assumed when no previous release is known
    #[serde(default = "default_initial_version")]
    pub initial: String,
}

impl Default for VersionConfig {
    fn default() -> Self {
        VersionConfig {
            clean: CleanConfig::default(),
            initial: default_initial_version(),
        }
    }
}

fn default_json_field() -> String {
    "version".to_string()
}

fn default_section() -> String {
    "package".to_string()
}

fn default_definition_file() -> PathBuf {
    PathBuf::from("Cargo.toml")
}

fn default_lock_file() -> PathBuf {
    PathBuf::from("Cargo.lock")
}

/// One manifest to keep in sync with the release version.
///
/// Selected by `kind` when the file is loaded; each kind maps to one
/// patching strategy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetConfig {
    /// Whole-document JSON manifest such as `package.json`
    Json {
        file: PathBuf,
        #[serde(default = "default_json_field")]
        field: String,
    },
    /// A source file with a single `PREFIX"version"` assignment
    Anchored { file: PathBuf, prefix: String },
    /// A definition file plus its lock file, keyed by the package name
    Cargo {
        #[serde(default = "default_definition_file")]
        file: PathBuf,
        #[serde(default = "default_lock_file")]
        lock_file: PathBuf,
        #[serde(default = "default_section")]
        section: String,
    },
    /// Fully caller-controlled anchored rewrite
    Custom {
        #[serde(default)]
        base_dir: PathBuf,
        file: PathBuf,
        prefix: String,
        #[serde(default)]
        flags: String,
    },
}

fn default_changelog_file() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_true() -> bool {
    true
}

/// Configuration for changelog maintenance.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_changelog_file")]
    pub file: PathBuf,

    /// Line index the new entry is spliced at (0 = top)
    #[serde(default)]
    pub from_line: usize,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            enabled: true,
            file: default_changelog_file(),
            from_line: 0,
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Errors
/// Fails if a file exists but cannot be read or parsed.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}
