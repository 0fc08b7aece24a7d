use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

use crate::domain::IncrementLevel;
use crate::error::{ReleaseError, Result};

/// Parse a strict semantic version (`MAJOR.MINOR.PATCH[-pre][+build]`).
pub fn parse_version(input: &str) -> Result<Version> {
    Version::parse(input).map_err(|e| ReleaseError::InvalidVersion {
        version: input.to_string(),
        policy: format!("strict ({})", e),
    })
}

/// Orders two versions by semver precedence, falling back to a lexical
/// comparison of the full strings when precedence is equal.
///
/// The fallback is what distinguishes `1.0.0+a` from `1.0.0+b`.
pub fn compare_versions(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre)
        .cmp(&(b.major, b.minor, b.patch, &b.pre))
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

/// Returns the greatest version in `versions`, if any.
pub fn latest_version<'a, I>(versions: I) -> Option<&'a Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}

/// Bumps a version according to the increment level.
///
/// Increments the matching component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// A pre-release that already sits on the target version is released
/// as-is instead of skipping ahead (`1.3.0-rc.1` + minor = `1.3.0`).
/// Pre-release and build metadata are always dropped.
pub fn increment(version: &Version, level: IncrementLevel) -> Version {
    let is_pre = !version.pre.is_empty();
    let mut next = Version::new(version.major, version.minor, version.patch);

    match level {
        IncrementLevel::Major => {
            if !(is_pre && version.minor == 0 && version.patch == 0) {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
        }
        IncrementLevel::Minor => {
            if !(is_pre && version.patch == 0) {
                next.minor += 1;
            }
            next.patch = 0;
        }
        IncrementLevel::Patch => {
            if !is_pre {
                next.patch += 1;
            }
        }
    }

    next.pre = Prerelease::EMPTY;
    next.build = BuildMetadata::EMPTY;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    #[test]
    fn test_parse_rejects_prefix() {
        assert!(parse_version("v1.2.3").is_err());
        assert!(parse_version("1.2").is_err());
    }

    #[test]
    fn test_increment_levels() {
        let base = v("1.2.3");
        assert_eq!(increment(&base, IncrementLevel::Major), v("2.0.0"));
        assert_eq!(increment(&base, IncrementLevel::Minor), v("1.3.0"));
        assert_eq!(increment(&base, IncrementLevel::Patch), v("1.2.4"));
    }

    #[test]
    fn test_increment_releases_prerelease() {
        assert_eq!(increment(&v("1.3.0-rc.1"), IncrementLevel::Minor), v("1.3.0"));
        assert_eq!(increment(&v("2.0.0-beta"), IncrementLevel::Major), v("2.0.0"));
        assert_eq!(increment(&v("1.2.4-alpha"), IncrementLevel::Patch), v("1.2.4"));
        assert_eq!(increment(&v("1.2.4-alpha"), IncrementLevel::Minor), v("1.3.0"));
    }

    #[test]
    fn test_increment_drops_build_metadata() {
        assert_eq!(increment(&v("1.0.0+build.7"), IncrementLevel::Patch), v("1.0.1"));
    }

    #[test]
    fn test_compare_semver_precedence() {
        assert_eq!(compare_versions(&v("1.10.0"), &v("1.9.0")), Ordering::Greater);
        assert_eq!(compare_versions(&v("1.0.0-rc.1"), &v("1.0.0")), Ordering::Less);
    }

    #[test]
    fn test_compare_build_metadata_tie_break() {
        assert_eq!(
            compare_versions(&v("1.0.0+b"), &v("1.0.0+a")),
            Ordering::Greater
        );
        assert_eq!(compare_versions(&v("1.0.0"), &v("1.0.0")), Ordering::Equal);
    }

    #[test]
    fn test_latest_version() {
        let versions = vec![v("0.9.0"), v("1.0.0-rc.2"), v("1.0.0"), v("0.10.1")];
        assert_eq!(latest_version(&versions), Some(&v("1.0.0")));
        assert_eq!(latest_version(&Vec::<Version>::new()), None);
    }
}
