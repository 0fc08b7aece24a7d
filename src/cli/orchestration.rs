//! Main release workflow orchestration logic
//!
//! Runs the release pipeline as ordered steps: classify commits, resolve
//! the release level, compute and clean the next version, rewrite every
//! manifest target, then merge the rendered changelog entry. The first
//! failing step stops the run; files written by earlier steps stay
//! written.

use std::path::PathBuf;

use chrono::NaiveDate;
use semver::Version;
use tracing::{info, warn};

use crate::analyzer::{classify_all, release_level, CommitClassifier};
use crate::boundary::BoundaryWarning;
use crate::changelog::{merge_entry, EntryRenderer, ReleaseMetadata};
use crate::cleaner::{self, CleaningPolicy};
use crate::config::Config;
use crate::domain::{increment, latest_version, parse_version, Commit, IncrementLevel};
use crate::error::Result;
use crate::manifest::{update_manifest_version, ManifestTarget};

/// Inputs of one release run
///
/// Mirrors the CLI arguments but stays independent of clap so the
/// workflow can be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Directory the configured paths are relative to
    pub root: PathBuf,

    /// Commits since the previous release
    pub commits: Vec<Commit>,

    /// Known earlier versions (tags), in any order and any prefix style
    pub previous_versions: Vec<String>,

    /// Release date written into the changelog entry
    pub date: NaiveDate,

    /// Compute and render, but write nothing
    pub dry_run: bool,
}

/// Next version derived from a batch of commits
#[derive(Debug, Clone, PartialEq)]
pub struct NextVersion {
    pub level: Option<IncrementLevel>,
    pub previous: Option<Version>,
    /// `None` when no commit warrants a release
    pub version: Option<Version>,
    pub commits: Vec<Commit>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a release run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub level: Option<IncrementLevel>,
    pub previous: Option<String>,
    /// Cleaned version that was (or would be) written
    pub version: Option<String>,
    pub entry: Option<String>,
    pub written: Vec<PathBuf>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Latest parseable version among `candidates`, after standard cleaning.
fn latest_previous(candidates: &[String], warnings: &mut Vec<BoundaryWarning>) -> Option<Version> {
    let mut parsed = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match cleaner::clean(&CleaningPolicy::Standard, candidate)
            .and_then(|cleaned| parse_version(&cleaned))
        {
            Ok(version) => parsed.push(version),
            Err(e) => {
                warn!(version = %candidate, "ignoring unparsable previous version");
                warnings.push(BoundaryWarning::UnparsableVersion {
                    version: candidate.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    latest_version(&parsed).cloned()
}

/// Classify `commits` and derive the next version.
///
/// # Errors
/// `EmptyCommitSet` for an empty batch, `InvalidVersion` for an
/// unparsable initial version.
pub fn compute_next_version<C: CommitClassifier + ?Sized>(
    commits: Vec<Commit>,
    previous_versions: &[String],
    config: &Config,
    classifier: &C,
) -> Result<NextVersion> {
    let commits = classify_all(classifier, commits);
    let level = release_level(&commits)?;

    let mut warnings = Vec::new();
    let previous = latest_previous(previous_versions, &mut warnings);

    let version = match level {
        Some(level) => {
            let base = match &previous {
                Some(previous) => previous.clone(),
                None => parse_version(&config.version.initial)?,
            };
            Some(increment(&base, level))
        }
        None => {
            warnings.push(BoundaryWarning::NothingToRelease {
                commit_count: commits.len(),
            });
            None
        }
    };

    Ok(NextVersion {
        level,
        previous,
        version,
        commits,
        warnings,
    })
}

/// Main release workflow
///
/// # Errors
/// The first error of any step. Configuration and the cleaned version
/// are validated before any file is touched.
pub fn run_release_workflow<C, R>(
    args: ReleaseWorkflowArgs,
    config: &Config,
    classifier: &C,
    renderer: &R,
) -> Result<WorkflowResult>
where
    C: CommitClassifier + ?Sized,
    R: EntryRenderer + ?Sized,
{
    let policy = CleaningPolicy::from_config(&config.version.clean)?;
    let targets = config
        .targets
        .iter()
        .map(|target| ManifestTarget::from_config(target, &args.root))
        .collect::<Result<Vec<_>>>()?;

    let next = compute_next_version(args.commits, &args.previous_versions, config, classifier)?;
    let mut result = WorkflowResult {
        level: next.level,
        previous: next.previous.as_ref().map(|v| v.to_string()),
        version: None,
        entry: None,
        written: Vec::new(),
        warnings: next.warnings,
    };

    let Some(version) = next.version else {
        info!("nothing to release");
        return Ok(result);
    };

    let cleaned = cleaner::clean(&policy, &version.to_string())?;
    let entry = renderer.render(
        &next.commits,
        &ReleaseMetadata {
            version: cleaned.clone(),
            previous: result.previous.clone(),
            date: args.date,
        },
    );
    result.version = Some(cleaned.clone());
    result.entry = Some(entry.clone());

    if args.dry_run {
        info!(version = %cleaned, "dry run, no files written");
        return Ok(result);
    }

    // Manifests receive exactly the version the changelog entry names
    for target in &targets {
        let update = update_manifest_version(target, &CleaningPolicy::Identity, &cleaned)?;
        result.written.extend(update.written);
        result.warnings.extend(
            update
                .skipped
                .into_iter()
                .map(|path| BoundaryWarning::LockFileMissing { path }),
        );
    }

    if config.changelog.enabled {
        let path = args.root.join(&config.changelog.file);
        let existed = path.exists();
        merge_entry(&path, &entry, config.changelog.from_line)?;
        if !existed {
            result
                .warnings
                .push(BoundaryWarning::ChangelogCreated { path: path.clone() });
        }
        result.written.push(path);
    }

    info!(version = %cleaned, files = result.written.len(), "release prepared");
    Ok(result)
}
