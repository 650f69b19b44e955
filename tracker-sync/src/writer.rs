//! Atomic patch-file writer.
//!
//! ## `write_patch` — 4-step protocol
//!
//! 1. Ensure the body ends with a newline (`git am` wants a complete last line).
//! 2. Write to `<path>.tracker.tmp`.
//! 3. Rename to final path (atomic on POSIX).
//! 4. On rename failure remove the `.tmp` and report the final path.
//!
//! File names are deterministic: `{index}-{hash}.patch` for a downloaded set,
//! `{hash}.patch` for a single applied patch. Two processes writing the same
//! set into one directory will collide; nothing guards against that.

use std::path::{Path, PathBuf};

use tracker_core::CommitHash;

use crate::error::{io_err, SyncError};

/// `<dir>/<index>-<hash>.patch`
pub fn set_patch_path(dir: &Path, index: usize, commit: &CommitHash) -> PathBuf {
    dir.join(format!("{index}-{commit}.patch"))
}

/// `<dir>/<hash>.patch`
pub fn single_patch_path(dir: &Path, commit: &CommitHash) -> PathBuf {
    dir.join(format!("{commit}.patch"))
}

/// Atomically write one patch body to `path`.
pub fn write_patch(path: &Path, body: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.tracker.tmp", path.display()));
    write_patch_with_tmp(path, body, &tmp)
}

fn write_patch_with_tmp(path: &Path, body: &str, tmp: &Path) -> Result<(), SyncError> {
    let mut content = body.to_owned();
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, &content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
