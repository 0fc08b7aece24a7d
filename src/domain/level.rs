use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

/// Scope of change implied by a commit or a whole release.
///
/// The variant order is the precedence order: `Patch < Minor < Major`.
/// Absence of a level is expressed as `Option::None` rather than a
/// fourth variant so that any concrete level always outranks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementLevel {
    Patch,
    Minor,
    Major,
}

impl IncrementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncrementLevel::Patch => "patch",
            IncrementLevel::Minor => "minor",
            IncrementLevel::Major => "major",
        }
    }
}

impl fmt::Display for IncrementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncrementLevel {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patch" => Ok(IncrementLevel::Patch),
            "minor" => Ok(IncrementLevel::Minor),
            "major" => Ok(IncrementLevel::Major),
            other => Err(ReleaseError::InvalidIncrementLevel {
                level: other.to_string(),
            }),
        }
    }
}
