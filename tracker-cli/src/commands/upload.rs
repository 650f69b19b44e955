//! `tracker upload` — push each diff body with its `TrackedAt:` marker.

use anyhow::{Context, Result};
use colored::Colorize;

use tracker_sync::{provenance::Placement, UploadReport};

use super::{GlobalArgs, Session};

pub fn run(global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let orchestrator = session.orchestrator();
    let report = orchestrator.upload().context("upload failed")?;
    print_upload_report(&report, orchestrator.server_url());
    Ok(())
}

pub fn print_upload_report(report: &UploadReport, url: &str) {
    for result in &report.results {
        match &result.outcome {
            Ok(()) => {
                println!("[^] {}", result.commit);
                if result.placement == Placement::Fallback {
                    println!(
                        "    {} no '---' line; TrackedAt placed after the headers",
                        "warning:".yellow()
                    );
                }
            }
            Err(err) => println!(
                "{} Upload of {} failed. ({err})",
                "[ERR]".red().bold(),
                result.commit
            ),
        }
    }
    println!(
        "{} patches were uploaded to tracker [{url}]",
        report.uploaded()
    );
}
