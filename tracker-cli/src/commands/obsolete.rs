//! `tracker obsolete <SET_ID>`

use anyhow::{Context, Result};
use clap::Args;

use super::{GlobalArgs, Session};

/// Mark a patch-set as superseded.
#[derive(Args, Debug)]
pub struct ObsoleteArgs {
    /// Patch-set id on the tracker server.
    pub set_id: String,
}

impl ObsoleteArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = Session::open(global)?;
        session
            .orchestrator()
            .obsolete(&self.set_id)
            .with_context(|| format!("failed to obsolete patch-set #{}", self.set_id))?;
        println!("Patch-set [#{}] marked as obsolete.", self.set_id);
        Ok(())
    }
}
