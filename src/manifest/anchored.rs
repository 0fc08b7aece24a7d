//! Anchored rewrites: a prefix pattern immediately followed by a quoted
//! version literal. Only the payload between the quotes changes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{ReleaseError, Result};
use crate::file_io;

/// Generic quoted-string capture appended to every prefix.
const QUOTED: &str = r#"(?:"(?P<version_dq>[^"\r\n]*)"|'(?P<version_sq>[^'\r\n]*)')"#;

/// Flags that map onto inline regex flags.
const INLINE_FLAGS: &[char] = &['i', 'm', 's', 'x', 'U'];

/// Flags accepted for compatibility but meaningless here: every match is
/// counted anyway and patterns are always unicode-aware.
const IGNORED_FLAGS: &[char] = &['g', 'u', 'y', 'd'];

fn leading_flags_regex() -> &'static Regex {
    static LEADING: OnceLock<Regex> = OnceLock::new();
    LEADING.get_or_init(|| Regex::new(r"^\(\?([a-zA-Z]+)\)").expect("static flag regex"))
}

/// Build `prefix` + quoted capture as one regex.
pub fn combined_pattern(prefix: &Regex) -> Result<Regex> {
    Ok(Regex::new(&format!("(?:{}){}", prefix.as_str(), QUOTED))?)
}

/// Replace the quoted payload following the single match of `pattern`.
///
/// Returns the number of matches when it is not exactly one.
pub fn replace_quoted(
    content: &str,
    pattern: &Regex,
    version: &str,
) -> std::result::Result<String, usize> {
    let captures: Vec<_> = pattern.captures_iter(content).collect();
    if captures.len() != 1 {
        return Err(captures.len());
    }

    let payload = captures[0]
        .name("version_dq")
        .or_else(|| captures[0].name("version_sq"))
        .ok_or(0usize)?;

    let mut updated = String::with_capacity(content.len() + version.len());
    updated.push_str(&content[..payload.start()]);
    updated.push_str(version);
    updated.push_str(&content[payload.end()..]);
    Ok(updated)
}

/// Rewrite the version literal anchored by `prefix` inside `path`.
///
/// # Errors
/// `FileNotFound` if the file is absent, `PatternNotFound` unless the
/// prefix plus quoted literal matches exactly once. The file is left
/// untouched on error.
pub fn update_anchored(path: &Path, prefix: &Regex, version: &str) -> Result<()> {
    let pattern = combined_pattern(prefix)?;
    apply(path, &pattern, prefix.as_str(), version)
}

fn apply(path: &Path, pattern: &Regex, shown: &str, version: &str) -> Result<()> {
    let content = file_io::read_existing(path)?;
    let updated = replace_quoted(&content, pattern, version)
        .map_err(|matches| ReleaseError::pattern(path, shown, matches))?;

    file_io::write_atomic(path, &updated)?;
    info!(path = %path.display(), version, "updated version literal");
    Ok(())
}

/// Split a leading inline flag group such as `(?im)` off a pattern.
fn split_inline_flags(prefix: &str) -> (&str, &str) {
    match leading_flags_regex().captures(prefix) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            let flags = caps.get(1).map_or("", |m| m.as_str());
            (flags, &prefix[whole..])
        }
        None => ("", prefix),
    }
}

/// Union of both flag sources, translated to one inline group.
fn merge_flags(inline: &str, supplied: &str) -> Result<String> {
    let mut merged = BTreeSet::new();
    for flag in inline.chars().chain(supplied.chars()) {
        if INLINE_FLAGS.contains(&flag) {
            merged.insert(flag);
        } else if !IGNORED_FLAGS.contains(&flag) {
            return Err(ReleaseError::config(format!(
                "unsupported regex flag '{}' in '{}{}'",
                flag, inline, supplied
            )));
        }
    }

    if merged.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("(?{})", merged.into_iter().collect::<String>()))
    }
}

/// Build the combined pattern for a caller-supplied prefix and flags.
pub fn custom_pattern(prefix: &str, flags: &str) -> Result<Regex> {
    let (inline, body) = split_inline_flags(prefix);
    let flag_group = merge_flags(inline, flags)?;
    let source = format!("{}(?:{}){}", flag_group, body, QUOTED);
    debug!(pattern = %source, "built custom version pattern");
    Regex::new(&source)
        .map_err(|e| ReleaseError::config(format!("invalid prefix pattern '{}': {}", prefix, e)))
}

/// Fully configurable anchored rewrite of `root/base_dir/file`.
///
/// # Errors
/// `InvalidConfiguration` if `base_dir` or `file` is absolute or the
/// pattern does not compile, then the same errors as [`update_anchored`].
pub fn update_custom(
    root: &Path,
    base_dir: &Path,
    file: &Path,
    prefix: &str,
    flags: &str,
    version: &str,
) -> Result<PathBuf> {
    if base_dir.is_absolute() {
        return Err(ReleaseError::config(format!(
            "base_dir must be relative, got {}",
            base_dir.display()
        )));
    }
    if file.is_absolute() {
        return Err(ReleaseError::config(format!(
            "file must be relative, got {}",
            file.display()
        )));
    }

    let pattern = custom_pattern(prefix, flags)?;
    let path = root.join(base_dir).join(file);
    apply(&path, &pattern, prefix, version)?;
    Ok(path)
}
