//! Splicing a new entry into a line-oriented changelog.
//!
//! Segments are joined with exactly one blank line between them. Blank
//! runs at the joins and at the document edges are collapsed, so merging
//! the same kind of entry repeatedly does not pile up separators.
//!
//! Re-merging is only stable when the insertion index is recomputed
//! against the previous output. Reusing an index that pointed into the
//! old content inserts at a shifted position.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::file_io;

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn trim_leading_blank<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let start = lines
        .iter()
        .position(|line| !is_blank(line))
        .unwrap_or(lines.len());
    &lines[start..]
}

fn trim_trailing_blank(lines: &mut Vec<&str>) {
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }
}

/// Append `next` to `acc` with a single blank line between them.
fn combine<'a>(mut acc: Vec<&'a str>, next: &'a [&'a str]) -> Vec<&'a str> {
    trim_trailing_blank(&mut acc);
    let next = trim_leading_blank(next);
    if acc.is_empty() {
        return next.to_vec();
    }
    acc.push("");
    acc.extend_from_slice(next);
    acc
}

/// Merge `entry` into `existing` before line `insertion_index`.
///
/// Indexes past the end append. The result keeps at most one blank line
/// at the end of the document, which becomes its terminating newline.
/// A CRLF document stays CRLF throughout, including the inserted entry.
pub fn merge_lines(existing: &str, entry: &str, insertion_index: usize) -> String {
    let crlf = existing.contains("\r\n");
    let existing = existing.replace("\r\n", "\n");
    let entry = entry.replace("\r\n", "\n");

    let existing_lines: Vec<&str> = existing.split('\n').collect();
    let entry_lines: Vec<&str> = entry.split('\n').collect();

    let split_at = insertion_index.min(existing_lines.len());
    let (head, tail) = existing_lines.split_at(split_at);

    let merged = combine(head.to_vec(), &entry_lines);
    let mut merged = combine(merged, tail);

    let leading = merged.iter().take_while(|line| is_blank(line)).count();
    merged.drain(..leading);

    let trailing = merged.iter().rev().take_while(|line| is_blank(line)).count();
    if trailing > 1 {
        merged.truncate(merged.len() - trailing + 1);
    }

    merged.join(if crlf { "\r\n" } else { "\n" })
}

/// Merge `entry` into the changelog stored at `path`.
///
/// A missing file is created empty first and treated as an empty
/// document.
pub fn merge_entry(path: &Path, entry: &str, from_line: usize) -> Result<()> {
    if !path.exists() {
        debug!(path = %path.display(), "changelog not found, creating it");
        file_io::write_atomic(path, "")?;
    }

    let existing = fs::read_to_string(path)?;
    let merged = merge_lines(&existing, entry, from_line);
    file_io::write_atomic(path, &merged)?;

    info!(path = %path.display(), from_line, "merged changelog entry");
    Ok(())
}
