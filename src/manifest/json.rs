//! Structured-field rewrite of whole-document JSON manifests.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use tracing::info;

use crate::error::{ReleaseError, Result};
use crate::file_io;

/// Indentation of the first indented line, if the document has one.
fn detect_indent(content: &str) -> Option<&str> {
    content.lines().skip(1).find_map(|line| {
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        (indent_len > 0 && indent_len < line.len()).then(|| &line[..indent_len])
    })
}

/// Serialize `value` in the layout the original document used.
fn render(value: &Value, original: &str) -> Result<String> {
    let body = original.trim();
    let mut rendered = if body.contains('\n') {
        let indent = detect_indent(body).unwrap_or("  ");
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        serde_json::to_string(value)?
    };

    if original.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

/// Set `field` to `version` in the JSON object stored at `path`.
///
/// Every other field keeps its value and position; the field is appended
/// when it does not exist yet.
///
/// # Errors
/// `FileNotFound` if the document is absent, `InvalidConfiguration` if
/// the top-level value is not an object.
pub fn update_json_field(path: &Path, field: &str, version: &str) -> Result<()> {
    let content = file_io::read_existing(path)?;
    let mut document: Value = serde_json::from_str(&content)?;

    let object = document.as_object_mut().ok_or_else(|| {
        ReleaseError::config(format!("{} is not a JSON object", path.display()))
    })?;
    object.insert(field.to_string(), Value::String(version.to_string()));

    file_io::write_atomic(path, &render(&document, &content)?)?;
    info!(path = %path.display(), field, version, "updated JSON manifest");
    Ok(())
}
