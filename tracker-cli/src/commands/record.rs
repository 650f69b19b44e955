//! `tracker record [--obsoletes <ID>] [--upload]`

use anyhow::{Context, Result};
use clap::Args;

use tracker_sync::RecordOptions;

use super::{upload::print_upload_report, GlobalArgs, Session};

/// Record the local commit range as a new patch-set.
#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Id of an earlier patch-set this recording supersedes.
    #[arg(long, value_name = "ID")]
    pub obsoletes: Option<String>,

    /// Upload the patch bodies right after recording.
    #[arg(long, short = 'u')]
    pub upload: bool,
}

impl RecordArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = Session::open(global)?;
        let orchestrator = session.orchestrator();
        let options = RecordOptions {
            obsoletes: self.obsoletes,
            upload: self.upload,
        };

        let outcome = orchestrator
            .record(&options)
            .context("failed to record patch-set")?;

        println!(
            "{} patches were recorded to the tracker server [{}][#{}][rev{}]",
            outcome.patches,
            orchestrator.server_url(),
            outcome.set.id,
            outcome.set.revision
        );
        if let Some(report) = &outcome.upload {
            print_upload_report(report, orchestrator.server_url());
        }
        Ok(())
    }
}
