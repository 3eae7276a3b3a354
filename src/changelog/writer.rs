//! Prepend entries to a changes file.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ChangelogError;

/// Insert `entry` at the top of the changes file at `path`.
///
/// The file must already exist. Existing lines are kept in order with
/// trailing whitespace stripped. The new content is written to a temporary
/// file next to the destination and renamed over it, so a failure never
/// leaves a half-written changes file behind.
pub fn prepend_entry(path: &Path, entry: &str) -> Result<(), ChangelogError> {
    let existing = std::fs::read_to_string(path).map_err(|source| ChangelogError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let new_content = prepend_to(&existing, entry);
    write_atomically(path, &new_content)?;

    debug!(path = %path.display(), bytes = new_content.len(), "Wrote changes file");
    Ok(())
}

/// Build the new file content: the entry, then every old line right-trimmed.
pub fn prepend_to(existing: &str, entry: &str) -> String {
    let mut content = String::with_capacity(entry.len() + existing.len());
    content.push_str(entry);

    for line in existing.lines() {
        content.push_str(line.trim_end());
        content.push('\n');
    }

    content
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ChangelogError> {
    let write_failed = |source| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    temp.write_all(content.as_bytes()).map_err(write_failed)?;
    temp.as_file().sync_all().map_err(write_failed)?;

    // Keep the mode of the file being replaced
    let permissions = std::fs::metadata(path).map_err(write_failed)?.permissions();
    temp.as_file().set_permissions(permissions).map_err(write_failed)?;

    temp.persist(path).map_err(|source| ChangelogError::PersistFailed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
