//! `tracker config init|show`

use anyhow::{Context, Result};
use clap::Subcommand;

use tracker_core::config as settings;

use super::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a default configuration file (never overwrites).
    Init,
    /// Print the effective configuration, password masked.
    Show,
}

pub fn run(global: &GlobalArgs, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Init => {
            let path = global.config_path()?;
            settings::init_to(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("✓ Wrote default configuration to {}", path.display());
        }
        ConfigCommand::Show => {
            let mut config = global.load_config()?;
            if !config.password.is_empty() {
                config.password = "********".to_string();
            }
            print!(
                "{}",
                serde_yaml::to_string(&config).context("failed to render configuration")?
            );
        }
    }
    Ok(())
}
