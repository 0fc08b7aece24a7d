//! Cross-file rewrite: a definition file (`Cargo.toml`) and the lock file
//! that records the same package's version.
//!
//! The lock file is written first. If the definition file then fails, the
//! lock file keeps its new version and the error says so.
//!
//! Only the first block naming the package is considered. Workspaces that
//! define the same name more than once are not disambiguated.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{info, warn};

use crate::error::{ReleaseError, Result};
use crate::file_io;
use crate::manifest::anchored;

/// Files touched by a cross-file update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrossFileUpdate {
    pub written: Vec<PathBuf>,
    /// Lock file that did not exist and was skipped
    pub missing_lock: Option<PathBuf>,
}

/// Byte ranges `[start, end)` of each section, split at lines that open a
/// `[table]` or `[[array]]` header. Content before the first header forms
/// its own block.
fn section_blocks(content: &str) -> Vec<(usize, usize)> {
    let mut starts = vec![0];
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if offset > 0 && line.starts_with('[') {
            starts.push(offset);
        }
        offset += line.len();
    }

    let mut blocks = Vec::with_capacity(starts.len());
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(content.len());
        blocks.push((*start, end));
    }
    blocks
}

/// Extract the package name declared under `[section]`.
///
/// The search never crosses into the next section header.
pub fn extract_package_name(content: &str, section: &str) -> Result<Option<String>> {
    let header = format!("[{}]", section);
    let name_re = Regex::new(r#"(?m)^[ \t]*name[ \t]*=[ \t]*"([^"\r\n]*)""#)?;

    for (start, end) in section_blocks(content) {
        let block = &content[start..end];
        let first_line = block.lines().next().unwrap_or("").trim();
        if first_line != header {
            continue;
        }
        return Ok(name_re
            .captures(block)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()));
    }
    Ok(None)
}

/// Replace the version recorded for `name` in lock-file content.
///
/// Looks for the first block where `name = "<name>"` is followed by a
/// `version = "..."` literal, without crossing a section header.
pub fn replace_locked_version(content: &str, name: &str, version: &str) -> Result<Option<String>> {
    let name_re = Regex::new(&format!(
        r#"(?m)^[ \t]*name[ \t]*=[ \t]*"{}""#,
        regex::escape(name)
    ))?;
    let version_re = Regex::new(r#"(?m)^[ \t]*version[ \t]*=[ \t]*"([^"\r\n]*)""#)?;

    for (start, end) in section_blocks(content) {
        let block = &content[start..end];
        let Some(name_match) = name_re.find(block) else {
            continue;
        };
        let rest = &block[name_match.end()..];
        let Some(payload) = version_re.captures(rest).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let at = start + name_match.end();
        let mut updated = String::with_capacity(content.len());
        updated.push_str(&content[..at + payload.start()]);
        updated.push_str(version);
        updated.push_str(&content[at + payload.end()..]);
        return Ok(Some(updated));
    }
    Ok(None)
}

/// Prefix matching the `version` key of `[section]`, never crossing into
/// a later header.
pub fn section_version_prefix(section: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?m)^\[{}\][ \t]*\r?\n(?:[^\[\r\n][^\r\n]*\r?\n|\r?\n)*?[ \t]*version[ \t]*=[ \t]*",
        regex::escape(section)
    ))?)
}

/// Update the package version in `definition` and, when present, `lock`.
///
/// # Errors
/// - `PatternNotFound` on the definition file if no name is declared
/// - `PatternNotFound` on the lock file if the package is not recorded;
///   the definition file is not touched
/// - `PartialUpdate` if the definition file fails after the lock file
///   was written
pub fn update_cross_file(
    definition: &Path,
    lock: &Path,
    section: &str,
    version: &str,
) -> Result<CrossFileUpdate> {
    let manifest = file_io::read_existing(definition)?;
    let name = extract_package_name(&manifest, section)?.ok_or_else(|| {
        ReleaseError::pattern(definition, format!("[{}] name = \"...\"", section), 0)
    })?;

    let mut update = CrossFileUpdate::default();

    if lock.exists() {
        let locked = file_io::read_existing(lock)?;
        let updated = replace_locked_version(&locked, &name, version)?.ok_or_else(|| {
            ReleaseError::pattern(
                lock,
                format!("name = \"{}\" ... version = \"...\"", name),
                0,
            )
        })?;
        file_io::write_atomic(lock, &updated)?;
        info!(path = %lock.display(), package = %name, version, "updated lock file");
        update.written.push(lock.to_path_buf());
    } else {
        warn!(path = %lock.display(), "lock file not found, skipping");
        update.missing_lock = Some(lock.to_path_buf());
    }

    let prefix = section_version_prefix(section)?;
    if let Err(source) = anchored::update_anchored(definition, &prefix, version) {
        return Err(match update.written.first() {
            Some(written) => ReleaseError::PartialUpdate {
                written: written.clone(),
                failed: definition.to_path_buf(),
                source: Box::new(source),
            },
            None => source,
        });
    }
    update.written.push(definition.to_path_buf());

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"[package]
name = "demo"
authors = ["someone"]
version = "0.1.0"
edition = "2021"

[dependencies]
serde = { version = "1.0" }

[dependencies.regex]
version = "1.0"
"#;

    const LOCK: &str = r#"version = 3

[[package]]
name = "aho-corasick"
version = "1.1.2"

[[package]]
name = "demo"
version = "0.1.0"
dependencies = [
 "regex",
]

[[package]]
name = "regex"
version = "1.10.0"
"#;

    #[test]
    fn test_extract_name() {
        assert_eq!(
            extract_package_name(MANIFEST, "package").unwrap(),
            Some("demo".to_string())
        );
    }

    #[test]
    fn test_extract_name_does_not_cross_sections() {
        let content = "[package]\nedition = \"2021\"\n\n[dependencies.x]\nname = \"x\"\n";
        assert_eq!(extract_package_name(content, "package").unwrap(), None);
    }

    #[test]
    fn test_extract_name_missing_section() {
        assert_eq!(extract_package_name("[workspace]\n", "package").unwrap(), None);
    }

    #[test]
    fn test_replace_locked_version() {
        let updated = replace_locked_version(LOCK, "demo", "0.2.0").unwrap().unwrap();
        assert!(updated.contains("name = \"demo\"\nversion = \"0.2.0\""));
        assert!(updated.contains("name = \"aho-corasick\"\nversion = \"1.1.2\""));
        assert!(updated.contains("name = \"regex\"\nversion = \"1.10.0\""));
        assert!(updated.starts_with("version = 3\n"));
    }

    #[test]
    fn test_replace_locked_version_requires_exact_name() {
        assert_eq!(replace_locked_version(LOCK, "dem", "0.2.0").unwrap(), None);
    }

    #[test]
    fn test_replace_locked_version_does_not_cross_sections() {
        let lock = "[[package]]\nname = \"demo\"\n\n[[package]]\nname = \"other\"\nversion = \"9.9.9\"\n";
        assert_eq!(replace_locked_version(lock, "demo", "1.0.0").unwrap(), None);
    }

    #[test]
    fn test_section_version_prefix_targets_package_only() {
        let prefix = section_version_prefix("package").unwrap();
        let pattern = anchored::combined_pattern(&prefix).unwrap();
        let updated = anchored::replace_quoted(MANIFEST, &pattern, "0.2.0").unwrap();
        assert!(updated.contains("version = \"0.2.0\"\nedition"));
        assert!(updated.contains("[dependencies.regex]\nversion = \"1.0\""));
        assert!(updated.contains("serde = { version = \"1.0\" }"));
    }

    #[test]
    fn test_section_version_prefix_rejects_inherited_version() {
        let prefix = section_version_prefix("package").unwrap();
        let pattern = anchored::combined_pattern(&prefix).unwrap();
        let content = "[package]\nname = \"a\"\nversion.workspace = true\n\n[features]\nversion = \"x\"\n";
        assert_eq!(anchored::replace_quoted(content, &pattern, "1.0.0"), Err(0));
    }

    #[test]
    fn test_section_blocks() {
        let blocks = section_blocks("a = 1\n[x]\nb = 2\n[[y]]\n");
        assert_eq!(blocks, vec![(0, 6), (6, 16), (16, 22)]);
    }
}
