//! `tracker ack|nack|push [--set <ID>] [-m <MESSAGE>]`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use tracker_core::Action;
use tracker_sync::{ActOutcome, ActReport, ActScope};

use super::{print_trailer, GlobalArgs, Session};

/// Apply a review action to a whole set or to every recorded commit of the range.
#[derive(Args, Debug)]
pub struct ActArgs {
    /// Act on this patch-set id instead of the local commits.
    #[arg(long, short = 's', value_name = "ID")]
    pub set: Option<String>,

    /// Message attached to the action.
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

impl ActArgs {
    pub fn run(self, global: &GlobalArgs, action: Action) -> Result<()> {
        let session = Session::open(global)?;
        let orchestrator = session.orchestrator();
        let scope = match self.set {
            Some(id) => ActScope::Set(id),
            None => ActScope::Branch,
        };

        let report = orchestrator
            .act(action, &scope, self.message.as_deref())
            .with_context(|| format!("{action} failed"))?;

        println!();
        match report {
            ActReport::Set { id } => {
                println!("[{action}][{id}] Status of all patches in set updated.");
            }
            ActReport::Branch(results) => {
                let label = action.as_str().to_uppercase();
                for result in results {
                    match result.outcome {
                        ActOutcome::Done => println!(
                            "[{}][{}] {}",
                            label.green().bold(),
                            result.commit.short(),
                            result.subject
                        ),
                        ActOutcome::NotTracked => println!(
                            "{} [{}] Patch has not been recorded by tracker (no TrackedAt header)",
                            "[ERR]".red().bold(),
                            result.commit.short()
                        ),
                        ActOutcome::Failed(err) => println!(
                            "{} [{}] {err}",
                            "[ERR]".red().bold(),
                            result.commit.short()
                        ),
                    }
                }
            }
        }
        print_trailer(orchestrator.server_url());
        Ok(())
    }
}
