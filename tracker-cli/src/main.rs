//! Tracker — command-line client for a patch review tracker.
//!
//! # Usage
//!
//! ```text
//! tracker record [--obsoletes <ID>] [--upload]
//! tracker upload
//! tracker download <SET_ID> [--branch <NAME>]
//! tracker ack|nack|push [--set <ID>] [-m <MESSAGE>]
//! tracker status
//! tracker apply <COMMIT>
//! tracker obsolete <SET_ID>
//! tracker list [VALUE] [-i <FIELD>]
//! tracker config init|show
//! ```
//!
//! Global: `--config <FILE>`, `-C <DIR>`, `--range <RANGE>`.
//!
//! Exit status: 0 on success, 1 for usage, git and other fatal errors, 2 when
//! the tracker server could not be reached or refused the request.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracker_sync::SyncError;

use commands::{
    act::ActArgs, apply::ApplyArgs, config::ConfigCommand, download::DownloadArgs,
    list::ListArgs, obsolete::ObsoleteArgs, record::RecordArgs, GlobalArgs,
};
use tracker_core::Action;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    version,
    about = "Record, review and replay git patch-sets on a tracker server",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record the local commit range as a new patch-set.
    Record(RecordArgs),

    /// Upload the diff of every commit in the range.
    Upload,

    /// Download a patch-set, optionally applying it to a new branch.
    Download(DownloadArgs),

    /// Acknowledge recorded patches.
    Ack(ActArgs),

    /// Reject recorded patches.
    Nack(ActArgs),

    /// Mark recorded patches as pushed.
    Push(ActArgs),

    /// Show the review status of each commit in the range.
    Status,

    /// Download one patch by commit hash and apply it to the current branch.
    Apply(ApplyArgs),

    /// Mark a patch-set as obsolete.
    Obsolete(ObsoleteArgs),

    /// List patch-sets on the server.
    List(ListArgs),

    /// Inspect or create the client configuration file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:?}");
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Record(args) => args.run(&global),
        Commands::Upload => commands::upload::run(&global),
        Commands::Download(args) => args.run(&global),
        Commands::Ack(args) => args.run(&global, Action::Ack),
        Commands::Nack(args) => args.run(&global, Action::Nack),
        Commands::Push(args) => args.run(&global, Action::Push),
        Commands::Status => commands::status::run(&global),
        Commands::Apply(args) => args.run(&global),
        Commands::Obsolete(args) => args.run(&global),
        Commands::List(args) => args.run(&global),
        Commands::Config { command } => commands::config::run(&global, command),
    }
}

/// Remote failures that re-running may fix exit with 2; everything else with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.chain().find_map(|cause| cause.downcast_ref::<SyncError>()) {
        Some(sync) if !sync.is_fatal() => 2,
        _ => 1,
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
