use crate::domain::IncrementLevel;
use crate::error::{ReleaseError, Result};

/// Pairwise precedence: the greater of two levels, where any concrete
/// level beats `None`.
pub fn higher(a: Option<IncrementLevel>, b: Option<IncrementLevel>) -> Option<IncrementLevel> {
    match (a, b) {
        (None, None) => None,
        (Some(level), None) | (None, Some(level)) => Some(level),
        (Some(a), Some(b)) => Some(a.max(b)),
    }
}

/// Reduce per-commit classifications to one release-wide level.
///
/// # Errors
/// `EmptyCommitSet` if `levels` yields nothing. An all-`None` batch is
/// not an error; it resolves to `Ok(None)`.
pub fn resolve<I>(levels: I) -> Result<Option<IncrementLevel>>
where
    I: IntoIterator<Item = Option<IncrementLevel>>,
{
    let mut levels = levels.into_iter().peekable();
    if levels.peek().is_none() {
        return Err(ReleaseError::EmptyCommitSet);
    }
    Ok(levels.fold(None, higher))
}

/// Like [`resolve`], for classifications that arrive as text.
///
/// # Errors
/// `InvalidIncrementLevel` for any label outside `patch`/`minor`/`major`.
pub fn resolve_labels<'a, I>(labels: I) -> Result<Option<IncrementLevel>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let levels = labels
        .into_iter()
        .map(|label| label.map(str::parse::<IncrementLevel>).transpose())
        .collect::<Result<Vec<_>>>()?;
    resolve(levels)
}
