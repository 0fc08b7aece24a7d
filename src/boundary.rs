use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met during a release run.
/// These should be reported to the user but do not stop the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Commits exist but none of them warrants a release
    NothingToRelease { commit_count: usize },
    /// The lock file of a cross-file target is absent and was skipped
    LockFileMissing { path: PathBuf },
    /// The changelog did not exist and was created
    ChangelogCreated { path: PathBuf },
    /// A previous version could not be parsed and was ignored
    UnparsableVersion { version: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NothingToRelease { commit_count } => {
                write!(
                    f,
                    "None of the {} commit(s) warrants a release",
                    commit_count
                )
            }
            BoundaryWarning::LockFileMissing { path } => {
                write!(f, "Lock file '{}' not found, skipped", path.display())
            }
            BoundaryWarning::ChangelogCreated { path } => {
                write!(f, "Changelog '{}' did not exist and was created", path.display())
            }
            BoundaryWarning::UnparsableVersion { version, reason } => {
                write!(f, "Cannot parse version '{}': {}", version, reason)
            }
        }
    }
}
