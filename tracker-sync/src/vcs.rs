//! Version-control collaborator.
//!
//! Every invocation names its working directory explicitly; the process-wide
//! current directory is never changed, so no workflow can leave it altered.

use std::path::Path;
use std::process::Command;

use crate::error::{io_err, SyncError};

/// Run a version-control command inside `dir` and return its stdout.
pub trait Vcs {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, SyncError>;
}

/// The `git` executable on `$PATH`.
#[derive(Debug, Clone, Default)]
pub struct GitCli;

impl Vcs for GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, SyncError> {
        let rendered = format!("git {}", args.join(" "));
        tracing::debug!("running `{}` in {}", rendered, dir.display());

        let output = Command::new("git")
            .arg("--no-pager")
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| io_err(dir, e))?;

        if !output.status.success() {
            return Err(SyncError::Backend {
                command: rendered,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| SyncError::InvalidData(format!("`{rendered}` printed non-UTF-8: {e}")))
    }
}
