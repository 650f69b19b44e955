//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracker_core::{
    Action, Commit, CommitHash, CreatedSet, ListFilter, PatchStatus, PatchStatusKind,
    RemotePatchSet, RemoteSet, Signature,
};

use crate::client::{ActionTarget, Tracker};
use crate::error::SyncError;
use crate::vcs::Vcs;

pub(crate) fn commit(hash: &str, subject: &str) -> Commit {
    Commit {
        hash: CommitHash::parse(hash).expect("test hash"),
        tree_hash: "e".repeat(40),
        parent_hashes: vec![],
        author: Signature {
            date: "2024-01-02 10:00:00 +0100".into(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
        },
        committer: Signature {
            date: "2024-01-02 11:00:00 +0100".into(),
            name: "Bob".into(),
            email: "bob@example.com".into(),
        },
        short_message: subject.into(),
        full_message: format!("{subject}\n\nBody.\n"),
    }
}

// ---------------------------------------------------------------------------
// ScriptedVcs
// ---------------------------------------------------------------------------

/// Answers commands by longest matching prefix of `args.join(" ")`;
/// anything unscripted fails like git would.
#[derive(Default)]
pub(crate) struct ScriptedVcs {
    script: Vec<(String, Result<String, String>)>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, prefix: &str, stdout: &str) -> Self {
        self.script.push((prefix.to_owned(), Ok(stdout.to_owned())));
        self
    }

    pub fn fail(mut self, prefix: &str, stderr: &str) -> Self {
        self.script.push((prefix.to_owned(), Err(stderr.to_owned())));
        self
    }

    /// Script a full range read for `commits` (structured, oneline, bodies).
    pub fn with_range(mut self, commits: &[Commit]) -> Self {
        let mut structured = String::new();
        let mut oneline = String::new();
        for c in commits {
            structured.push_str(&format!(
                "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1e}\n",
                c.hash,
                c.tree_hash,
                c.parent_hashes.join(" "),
                c.author.date,
                c.author.name,
                c.author.email,
                c.committer.date,
                c.committer.name,
                c.committer.email,
            ));
            oneline.push_str(&format!("{} {}\n", c.hash, c.short_message));
        }
        self = self
            .on("log --reverse --format", &structured)
            .on("log --reverse --pretty=oneline", &oneline);
        for c in commits {
            self = self.on(&format!("log -1 --format=%B {}", c.hash), &c.full_message);
        }
        self
    }

    pub fn calls_matching(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl Vcs for ScriptedVcs {
    fn run(&self, _dir: &Path, args: &[&str]) -> Result<String, SyncError> {
        let command = args.join(" ");
        self.calls.borrow_mut().push(command.clone());
        let answer = self
            .script
            .iter()
            .filter(|(prefix, _)| command.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, answer)| answer.clone());
        match answer {
            Some(Ok(stdout)) => Ok(stdout),
            Some(Err(stderr)) => Err(backend(&command, &stderr)),
            None => Err(backend(&command, "unscripted command")),
        }
    }
}

fn backend(command: &str, stderr: &str) -> SyncError {
    SyncError::Backend {
        command: format!("git {command}"),
        status: "exit status: 128".into(),
        stderr: stderr.into(),
    }
}

// ---------------------------------------------------------------------------
// FakeTracker
// ---------------------------------------------------------------------------

/// Per-commit answer of `GET /patch/{commit}`.
#[derive(Clone)]
pub(crate) enum FakeStatus {
    Found(PatchStatusKind),
    Missing,
    Broken,
}

#[derive(Default)]
pub(crate) struct FakeTracker {
    pub created: Option<CreatedSet>,
    pub sets: HashMap<String, Vec<String>>,
    pub bodies: HashMap<String, String>,
    pub failing: HashSet<String>,
    pub statuses: HashMap<String, FakeStatus>,
    pub listing: Vec<RemotePatchSet>,
    pub calls: RefCell<Vec<String>>,
    pub uploads: RefCell<Vec<(String, String)>>,
    pub payloads: RefCell<Vec<(String, Option<String>)>>,
    pub actions: RefCell<Vec<(ActionTarget, Action, Option<String>)>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn fail_if(&self, key: &str) -> Result<(), SyncError> {
        if self.failing.contains(key) {
            return Err(SyncError::Http {
                status: 500,
                body: format!("boom: {key}"),
            });
        }
        Ok(())
    }
}

impl Tracker for FakeTracker {
    fn create_set(&self, payload: &str, obsoletes: Option<&str>) -> Result<CreatedSet, SyncError> {
        self.log("create_set".into());
        self.payloads
            .borrow_mut()
            .push((payload.to_owned(), obsoletes.map(str::to_owned)));
        self.created
            .clone()
            .ok_or_else(|| SyncError::Transport("connection refused".into()))
    }

    fn upload_patch_body(&self, commit: &CommitHash, body: &str) -> Result<(), SyncError> {
        self.log(format!("upload {commit}"));
        self.fail_if(commit.as_str())?;
        self.uploads
            .borrow_mut()
            .push((commit.to_string(), body.to_owned()));
        Ok(())
    }

    fn download_patch_body(&self, commit: &CommitHash) -> Result<String, SyncError> {
        self.log(format!("download {commit}"));
        self.bodies.get(commit.as_str()).cloned().ok_or(SyncError::Http {
            status: 404,
            body: "Not Found".into(),
        })
    }

    fn fetch_set(&self, set_id: &str) -> Result<RemoteSet, SyncError> {
        self.log(format!("fetch_set {set_id}"));
        let patches = self.sets.get(set_id).ok_or(SyncError::Http {
            status: 404,
            body: "Not Found".into(),
        })?;
        Ok(RemoteSet {
            patches: patches
                .iter()
                .map(|h| CommitHash::parse(h).expect("test hash"))
                .collect(),
        })
    }

    fn post_action(
        &self,
        target: &ActionTarget,
        action: Action,
        message: Option<&str>,
    ) -> Result<(), SyncError> {
        let key = match target {
            ActionTarget::Set(id) | ActionTarget::Patch(id) => id.clone(),
        };
        self.log(format!("action {action} {key}"));
        self.fail_if(&key)?;
        self.actions
            .borrow_mut()
            .push((target.clone(), action, message.map(str::to_owned)));
        Ok(())
    }

    fn mark_obsolete(&self, set_id: &str) -> Result<(), SyncError> {
        self.log(format!("obsolete {set_id}"));
        self.fail_if(set_id)
    }

    fn fetch_patch_status(&self, commit: &CommitHash) -> Result<Option<PatchStatus>, SyncError> {
        self.log(format!("status {commit}"));
        match self.statuses.get(commit.as_str()) {
            Some(FakeStatus::Found(kind)) => Ok(Some(PatchStatus {
                commit: commit.clone(),
                status: *kind,
                revision: "1".into(),
                message: "remote message".into(),
            })),
            Some(FakeStatus::Broken) => Err(SyncError::Http {
                status: 500,
                body: "Internal Server Error".into(),
            }),
            Some(FakeStatus::Missing) | None => Ok(None),
        }
    }

    fn list_sets(&self, filter: Option<&ListFilter>) -> Result<Vec<RemotePatchSet>, SyncError> {
        self.log(format!("list {filter:?}"));
        Ok(self.listing.clone())
    }
}
