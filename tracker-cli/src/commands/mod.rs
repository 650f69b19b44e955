//! Subcommand implementations and the per-invocation session they share.

pub mod act;
pub mod apply;
pub mod config;
pub mod download;
pub mod list;
pub mod obsolete;
pub mod record;
pub mod status;
pub mod upload;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use tracker_core::{config as settings, Config};
use tracker_sync::{GitCli, HttpTracker, Orchestrator};

/// Options accepted by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Configuration file (default: ~/.tracker/config.yaml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Repository directory for git commands and patch files.
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    pub directory: PathBuf,

    /// Commit range to operate on (overrides the configured range).
    #[arg(long, global = true)]
    pub range: Option<String>,
}

impl GlobalArgs {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => settings::config_path().context("could not determine home directory"),
        }
    }

    /// Effective configuration: file (or defaults) plus command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.config_path()?;
        let mut config = settings::load_from(&path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        if let Some(range) = &self.range {
            config.range = range.clone();
        }
        Ok(config)
    }
}

/// Configuration and collaborators for one invocation.
pub struct Session {
    pub config: Config,
    pub dir: PathBuf,
    vcs: GitCli,
    tracker: HttpTracker,
}

impl Session {
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let config = global.load_config()?;
        let tracker = HttpTracker::new(config.credentials());
        tracing::debug!(url = %config.url, range = %config.range, "session opened");
        Ok(Self {
            dir: global.directory.clone(),
            vcs: GitCli,
            tracker,
            config,
        })
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.config, &self.vcs, &self.tracker, &self.dir)
    }
}

/// Closing line after per-commit output.
pub fn print_trailer(url: &str) {
    println!("  |\n  |--------> [{url}]\n");
}
