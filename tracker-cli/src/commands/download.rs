//! `tracker download <SET_ID> [--branch <NAME>]`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tracker_sync::DownloadOutcome;

use super::{GlobalArgs, Session};

/// Download a patch-set into `{index}-{hash}.patch` files.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Patch-set id on the tracker server.
    pub set_id: String,

    /// Create this branch and apply every patch onto it with `git am`.
    #[arg(long, short = 'b')]
    pub branch: Option<String>,
}

impl DownloadArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = Session::open(global)?;
        let report = session
            .orchestrator()
            .download(&self.set_id, self.branch.as_deref())
            .with_context(|| format!("download of patch-set #{} failed", self.set_id))?;

        println!();
        if let Some(output) = &report.branch_output {
            print!("{output}");
        }
        for patch in &report.patches {
            match &patch.outcome {
                DownloadOutcome::Stored => println!("[v] {}-{}.patch", patch.index, patch.commit),
                DownloadOutcome::Applied { output } => print!("{output}"),
                DownloadOutcome::Failed(err) => {
                    println!("{} {}: {err}", "[ERR]".red().bold(), patch.commit)
                }
            }
        }
        println!("\n -> {} patches downloaded.", report.downloaded());
        Ok(())
    }
}
