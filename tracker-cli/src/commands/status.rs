//! `tracker status` — remote review state of each commit in the range.

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use tracker_core::PatchStatusKind;
use tracker_sync::{StatusOutcome, StatusReport};

use super::{print_trailer, GlobalArgs, Session};

pub fn run(global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let orchestrator = session.orchestrator();
    let report = orchestrator.status().context("status failed")?;

    println!();
    match report {
        StatusReport::NotRecorded => {
            println!("ERR: This branch is not recorded yet. ($ tracker record)\n");
        }
        StatusReport::Tracked(entries) => {
            for entry in entries {
                match entry.outcome {
                    StatusOutcome::Found(status) => println!(
                        "[{}][{}][rev{}] {}",
                        status.commit.short(),
                        status_label(status.status),
                        status.revision,
                        status.message
                    ),
                    StatusOutcome::NoRecord => println!(
                        "{}[{}] not recorded on the server",
                        "[ERR]".red().bold(),
                        entry.commit.short()
                    ),
                    StatusOutcome::Failed(err) => println!(
                        "{}[{}] {err}",
                        "[ERR]".red().bold(),
                        entry.commit.short()
                    ),
                }
            }
            print_trailer(orchestrator.server_url());
        }
    }
    Ok(())
}

pub fn status_label(status: PatchStatusKind) -> ColoredString {
    let label = status.as_str().to_uppercase();
    match status {
        PatchStatusKind::New => label.cyan().bold(),
        PatchStatusKind::Ack => label.green().bold(),
        PatchStatusKind::Nack => label.red().bold(),
        PatchStatusKind::Push => label.magenta().bold(),
        PatchStatusKind::Obsolete | PatchStatusKind::Unknown => label.bright_black().bold(),
    }
}
