//! Scoped read/write helpers shared by the manifest and changelog writers.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ReleaseError, Result};

/// Read a file that must already exist.
pub fn read_existing(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ReleaseError::not_found(path),
        _ => ReleaseError::Io(e),
    })
}

/// Replace `path` with `content` via a temp file in the same directory.
///
/// The original is only replaced once the new content is fully on disk.
/// An existing target keeps its permissions, and a symlinked target is
/// resolved so the file it points to is the one rewritten.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let (target, permissions) = if path.exists() {
        (fs::canonicalize(path)?, Some(fs::metadata(path)?.permissions()))
    } else {
        (path.to_path_buf(), None)
    };

    let parent_dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    if !parent_dir.exists() {
        debug!(dir = %parent_dir.display(), "creating parent directory");
        fs::create_dir_all(parent_dir)?;
    }

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    if let Some(permissions) = permissions {
        temp_file.as_file().set_permissions(permissions)?;
    }

    debug!(path = %target.display(), bytes = content.len(), "persisting file");
    temp_file.persist(&target).map_err(|e| ReleaseError::Io(e.error))?;
    Ok(())
}
