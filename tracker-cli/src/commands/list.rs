//! `tracker list [VALUE] [-i <FIELD>]`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use super::{status::status_label, GlobalArgs, Session};

/// List patch-sets, optionally filtered.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Status (new, ack, nack, push) or, with --field, any field value.
    pub value: Option<String>,

    /// Field to filter on when VALUE is not a status.
    #[arg(long = "field", short = 'i', value_name = "FIELD")]
    pub field: Option<String>,
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = Session::open(global)?;
        let sets = session
            .orchestrator()
            .list(self.value.as_deref(), self.field.as_deref())
            .context("failed to list patch-sets")?;

        println!();
        if sets.is_empty() {
            println!("No patch-sets found.");
            return Ok(());
        }
        for set in sets {
            println!(
                "[{}][{}] {} ({} patches by {})",
                set.id,
                status_label(set.status),
                set.first_patch_message.bold(),
                set.num_of_patches,
                set.author
            );
        }
        Ok(())
    }
}
