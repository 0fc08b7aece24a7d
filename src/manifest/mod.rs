//! Rewriting embedded version strings inside manifest, lock and source
//! files without a full structured parser.
//!
//! - `json` - set a named field in a JSON document
//! - `anchored` - replace the quoted literal after a prefix pattern
//! - `cargo` - keep a definition file and its lock file consistent
//!
//! Every variant cleans the version first and touches nothing when the
//! cleaned value is rejected.

pub mod anchored;
pub mod cargo;
pub mod json;

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::cleaner::{self, CleaningPolicy};
use crate::config::TargetConfig;
use crate::error::{ReleaseError, Result};

pub use anchored::{update_anchored, update_custom};
pub use cargo::{update_cross_file, CrossFileUpdate};
pub use json::update_json_field;

/// A file plus the locator that finds its version literal.
#[derive(Debug, Clone)]
pub enum ManifestTarget {
    Json {
        file: PathBuf,
        field: String,
    },
    Anchored {
        file: PathBuf,
        prefix: Regex,
    },
    CrossFile {
        definition: PathBuf,
        lock: PathBuf,
        section: String,
    },
    Custom {
        root: PathBuf,
        base_dir: PathBuf,
        file: PathBuf,
        prefix: String,
        flags: String,
    },
}

impl ManifestTarget {
    /// Build a target from configuration, resolving paths against `root`.
    ///
    /// Custom targets keep their relative paths so that the update itself
    /// can validate them.
    pub fn from_config(config: &TargetConfig, root: &Path) -> Result<Self> {
        Ok(match config {
            TargetConfig::Json { file, field } => ManifestTarget::Json {
                file: root.join(file),
                field: field.clone(),
            },
            TargetConfig::Anchored { file, prefix } => ManifestTarget::Anchored {
                file: root.join(file),
                prefix: Regex::new(prefix).map_err(|e| {
                    ReleaseError::config(format!("invalid prefix pattern '{}': {}", prefix, e))
                })?,
            },
            TargetConfig::Cargo {
                file,
                lock_file,
                section,
            } => ManifestTarget::CrossFile {
                definition: root.join(file),
                lock: root.join(lock_file),
                section: section.clone(),
            },
            TargetConfig::Custom {
                base_dir,
                file,
                prefix,
                flags,
            } => ManifestTarget::Custom {
                root: root.to_path_buf(),
                base_dir: base_dir.clone(),
                file: file.clone(),
                prefix: prefix.clone(),
                flags: flags.clone(),
            },
        })
    }

    /// Primary file this target rewrites.
    pub fn path(&self) -> PathBuf {
        match self {
            ManifestTarget::Json { file, .. } | ManifestTarget::Anchored { file, .. } => {
                file.clone()
            }
            ManifestTarget::CrossFile { definition, .. } => definition.clone(),
            ManifestTarget::Custom {
                root,
                base_dir,
                file,
                ..
            } => root.join(base_dir).join(file),
        }
    }
}

/// Outcome of one target update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestUpdate {
    pub version: String,
    pub written: Vec<PathBuf>,
    /// Optional companion files that were absent
    pub skipped: Vec<PathBuf>,
}

/// Clean `version` and write it into `target`.
///
/// # Errors
/// `InvalidVersion` before any file is read when cleaning yields nothing;
/// otherwise the errors of the selected variant.
pub fn update_manifest_version(
    target: &ManifestTarget,
    policy: &CleaningPolicy,
    version: &str,
) -> Result<ManifestUpdate> {
    let cleaned = cleaner::clean(policy, version)?;
    debug!(target = %target.path().display(), version = %cleaned, "updating manifest");

    let mut update = ManifestUpdate {
        version: cleaned.clone(),
        ..ManifestUpdate::default()
    };

    match target {
        ManifestTarget::Json { file, field } => {
            json::update_json_field(file, field, &cleaned)?;
            update.written.push(file.clone());
        }
        ManifestTarget::Anchored { file, prefix } => {
            anchored::update_anchored(file, prefix, &cleaned)?;
            update.written.push(file.clone());
        }
        ManifestTarget::CrossFile {
            definition,
            lock,
            section,
        } => {
            let cross = cargo::update_cross_file(definition, lock, section, &cleaned)?;
            update.written = cross.written;
            update.skipped.extend(cross.missing_lock);
        }
        ManifestTarget::Custom {
            root,
            base_dir,
            file,
            prefix,
            flags,
        } => {
            let path = anchored::update_custom(root, base_dir, file, prefix, flags, &cleaned)?;
            update.written.push(path);
        }
    }

    Ok(update)
}
