//! Analysis engine for determining the release level from commits

pub mod classifier;
pub mod level_resolver;

pub use classifier::{classify_all, release_level, CommitClassifier, ConventionalClassifier};
pub use level_resolver::{higher, resolve, resolve_labels};
