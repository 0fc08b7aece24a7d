use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for release-sync operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid increment level: '{level}' (expected patch, minor or major)")]
    InvalidIncrementLevel { level: String },

    #[error("No commits to release")]
    EmptyCommitSet,

    #[error("Invalid version: '{version}' is empty after applying {policy} cleaning")]
    InvalidVersion { version: String, policy: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Pattern not found: '{pattern}' matched {matches} times in {} (expected exactly once)", path.display())]
    PatternNotFound {
        path: PathBuf,
        pattern: String,
        matches: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Partial update: {} was written but {} failed: {source}", written.display(), failed.display())]
    PartialUpdate {
        written: PathBuf,
        failed: PathBuf,
        #[source]
        source: Box<ReleaseError>,
    },

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-sync
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidConfiguration(msg.into())
    }

    /// Create a version error for a value that cleaned down to nothing
    pub fn version(version: impl Into<String>, policy: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion {
            version: version.into(),
            policy: policy.into(),
        }
    }

    /// Create a pattern error for a locator that did not match exactly once
    pub fn pattern(path: impl Into<PathBuf>, pattern: impl Into<String>, matches: usize) -> Self {
        ReleaseError::PatternNotFound {
            path: path.into(),
            pattern: pattern.into(),
            matches,
        }
    }

    /// Create a missing-file error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ReleaseError::FileNotFound { path: path.into() }
    }
}
