//! Version normalization applied before a version is written anywhere.

use regex::Regex;
use semver::Version;
use tracing::debug;

use crate::config::CleanConfig;
use crate::error::{ReleaseError, Result};

/// Rule normalizing a version string.
#[derive(Debug, Clone)]
pub enum CleaningPolicy {
    /// Canonical semver form: trimmed, leading `=`/`v` removed
    Standard,
    /// Remove every match of the pattern
    Strip(Regex),
    /// Leave the input untouched
    Identity,
}

impl CleaningPolicy {
    /// Compile the configured policy.
    pub fn from_config(config: &CleanConfig) -> Result<Self> {
        match config {
            CleanConfig::Standard => Ok(CleaningPolicy::Standard),
            CleanConfig::Identity => Ok(CleaningPolicy::Identity),
            CleanConfig::Strip(pattern) => Regex::new(pattern)
                .map(CleaningPolicy::Strip)
                .map_err(|e| {
                    ReleaseError::config(format!("invalid strip pattern '{}': {}", pattern, e))
                }),
        }
    }

    fn name(&self) -> String {
        match self {
            CleaningPolicy::Standard => "standard".to_string(),
            CleaningPolicy::Strip(re) => format!("strip /{}/", re.as_str()),
            CleaningPolicy::Identity => "identity".to_string(),
        }
    }
}

/// Canonical semver normalization.
///
/// Returns `None` when the input is not a valid version once the
/// surrounding whitespace and `=`/`v` prefixes are gone.
fn standard_clean(version: &str) -> Option<String> {
    let trimmed = version.trim().trim_start_matches(['=', 'v', 'V']).trim_start();
    Version::parse(trimmed).ok().map(|v| v.to_string())
}

/// Normalize `version` according to `policy`.
///
/// # Errors
/// `InvalidVersion` when the cleaned result is empty. Callers must stop
/// before touching any file in that case.
pub fn clean(policy: &CleaningPolicy, version: &str) -> Result<String> {
    let cleaned = match policy {
        CleaningPolicy::Standard => standard_clean(version).unwrap_or_default(),
        CleaningPolicy::Strip(re) => re.replace_all(version, "").into_owned(),
        CleaningPolicy::Identity => version.to_string(),
    };

    if cleaned.is_empty() {
        return Err(ReleaseError::version(version, policy.name()));
    }

    debug!(input = version, output = %cleaned, "cleaned version");
    Ok(cleaned)
}
