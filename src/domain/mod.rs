//! Domain logic - pure release rules independent of the filesystem

pub mod commit;
pub mod level;
pub mod version;

pub use commit::{Commit, ParsedCommit};
pub use level::IncrementLevel;
pub use version::{compare_versions, increment, latest_version, parse_version};
