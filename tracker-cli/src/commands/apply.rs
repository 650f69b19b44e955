//! `tracker apply <COMMIT>` — fetch one patch and `git am` it after confirmation.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use tracker_sync::ApplyOutcome;

use super::{GlobalArgs, Session};

/// Download a single patch by commit hash and apply it to the current branch.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Full 40-character commit hash.
    pub commit: String,

    /// Apply without asking.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl ApplyArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = Session::open(global)?;
        let yes = self.yes;
        let outcome = session
            .orchestrator()
            .apply(&self.commit, |path| yes || confirm(path))
            .with_context(|| format!("failed to apply {}", self.commit))?;

        match outcome {
            ApplyOutcome::Applied { output, .. } => print!("{output}"),
            ApplyOutcome::Declined => println!("Aborted; nothing was applied."),
        }
        Ok(())
    }
}

fn confirm(path: &Path) -> bool {
    print!(
        "Downloaded {}.\nAre you sure you want to apply patch to current branch? [Y/n] ",
        path.display()
    );
    let _ = io::stdout().flush();

    is_yes(io::stdin().lock())
}

/// Empty answer means yes; end of input or a read error means no.
fn is_yes(mut input: impl BufRead) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => !matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no"),
    }
}

#[cfg(test)]
mod tests {
    use super::is_yes;

    #[test]
    fn closed_input_declines() {
        assert!(!is_yes(&b""[..]));
    }

    #[test]
    fn answers() {
        assert!(is_yes(&b"\n"[..]));
        assert!(is_yes(&b"y\n"[..]));
        assert!(is_yes(&b"Yes\n"[..]));
        assert!(!is_yes(&b"n\n"[..]));
        assert!(!is_yes(&b"NO\n"[..]));
    }
}
