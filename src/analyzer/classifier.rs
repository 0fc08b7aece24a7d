use crate::analyzer::level_resolver;
use crate::config::ConventionalCommitsConfig;
use crate::domain::{Commit, IncrementLevel, ParsedCommit};
use crate::error::Result;

/// Maps a single commit to the increment level it implies.
pub trait CommitClassifier {
    fn classify(&self, commit: &Commit) -> Option<IncrementLevel>;
}

/// Classifies commits by their conventional-commit header
pub struct ConventionalClassifier {
    config: ConventionalCommitsConfig,
}

impl ConventionalClassifier {
    /// Create a new classifier
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        ConventionalClassifier { config }
    }

    fn has_breaking_footer(&self, body: &str) -> bool {
        self.config
            .breaking_change_indicators
            .iter()
            .any(|indicator| body.contains(indicator.as_str()))
    }
}

impl CommitClassifier for ConventionalClassifier {
    fn classify(&self, commit: &Commit) -> Option<IncrementLevel> {
        let parsed = ParsedCommit::parse(&commit.subject)?;

        if parsed.has_breaking_marker || self.has_breaking_footer(&commit.body) {
            return Some(IncrementLevel::Major);
        }

        if self.config.minor_types.contains(&parsed.r#type) {
            Some(IncrementLevel::Minor)
        } else if self.config.patch_types.contains(&parsed.r#type) {
            Some(IncrementLevel::Patch)
        } else {
            None
        }
    }
}

/// Attach a level to every commit that does not carry one yet.
pub fn classify_all<C: CommitClassifier + ?Sized>(
    classifier: &C,
    commits: Vec<Commit>,
) -> Vec<Commit> {
    commits
        .into_iter()
        .map(|commit| {
            if commit.level.is_some() {
                commit
            } else {
                let level = classifier.classify(&commit);
                commit.with_level(level)
            }
        })
        .collect()
}

/// Release-wide level for a batch of already classified commits.
pub fn release_level(commits: &[Commit]) -> Result<Option<IncrementLevel>> {
    level_resolver::resolve(commits.iter().map(|c| c.level))
}
