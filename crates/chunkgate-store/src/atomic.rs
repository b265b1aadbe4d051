//! Atomic file replacement
//!
//! Content goes to a sibling temp file which is flushed and then renamed over
//! the target, so readers see either the old document or the new one.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::{io_failure, Result};

/// Temp file used while replacing `target`
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

/// Replace `target` with `content` in one rename
///
/// Creates the parent directory when missing. A failed write leaves the old
/// document in place and no temp file behind.
///
/// # Errors
/// Returns `RepositoryFailure` if any filesystem step fails.
pub fn atomic_write(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| io_failure("create dir", parent, e))?;
    }

    let temp = temp_path_for(target);
    if let Err(err) = write_synced(&temp, content) {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }

    if let Err(e) = fs::rename(&temp, target) {
        let _ = fs::remove_file(&temp);
        return Err(io_failure("rename", target, e));
    }

    sync_parent(target)
}

fn write_synced(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| io_failure("create", path, e))?;
    file.write_all(content)
        .map_err(|e| io_failure("write", path, e))?;
    file.sync_all().map_err(|e| io_failure("sync", path, e))
}

/// Flush the directory entry so the rename itself survives a crash
#[cfg(unix)]
fn sync_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| io_failure("sync dir", parent, e)),
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn sync_parent(_target: &Path) -> Result<()> {
    Ok(())
}
