//! Client-side workflows: record, upload, download, act, status, apply,
//! obsolete, list.
//!
//! An [`Orchestrator`] holds no state of its own between calls; everything
//! lives in the local commits and on the server. Workflows that decompose per
//! commit (upload, act, status, download) collect per-commit outcomes instead
//! of stopping at the first remote failure. Backend (git) failures and usage
//! errors always abort the workflow.

use std::path::{Path, PathBuf};

use tracker_core::{
    Action, Commit, CommitHash, Config, CreatedSet, ListFilter, PatchStatus, RemotePatchSet,
};

use crate::client::{ActionTarget, Tracker};
use crate::encoder::PatchSetPayload;
use crate::error::SyncError;
use crate::log_reader;
use crate::patch_stream::PatchStream;
use crate::provenance::{self, Placement};
use crate::vcs::Vcs;
use crate::writer;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Options for [`Orchestrator::record`].
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Id of a previously recorded set this one replaces.
    pub obsoletes: Option<String>,
    /// Run [`Orchestrator::upload`] after a successful record.
    pub upload: bool,
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub patches: usize,
    pub set: CreatedSet,
    pub upload: Option<UploadReport>,
}

/// Result of uploading one patch body.
#[derive(Debug)]
pub struct UploadResult {
    pub commit: CommitHash,
    pub placement: Placement,
    pub outcome: Result<(), SyncError>,
}

#[derive(Debug, Default)]
pub struct UploadReport {
    pub results: Vec<UploadResult>,
}

impl UploadReport {
    pub fn uploaded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_ok()).count()
    }
}

#[derive(Debug)]
pub enum DownloadOutcome {
    /// Written to disk, not applied.
    Stored,
    /// Written and applied with `git am`; `output` is git's stdout.
    Applied { output: String },
    Failed(SyncError),
}

#[derive(Debug)]
pub struct DownloadedPatch {
    pub index: usize,
    pub commit: CommitHash,
    pub path: PathBuf,
    pub outcome: DownloadOutcome,
}

#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Output of `git checkout -b`, when a branch was requested.
    pub branch_output: Option<String>,
    pub patches: Vec<DownloadedPatch>,
}

impl DownloadReport {
    pub fn downloaded(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| !matches!(p.outcome, DownloadOutcome::Failed(_)))
            .count()
    }
}

/// What an action applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActScope {
    /// One call against a remote set id.
    Set(String),
    /// One call per commit of the local range.
    Branch,
}

#[derive(Debug)]
pub enum ActOutcome {
    Done,
    /// The commit message has no `TrackedAt:` line; nothing was sent.
    NotTracked,
    Failed(SyncError),
}

#[derive(Debug)]
pub struct ActResult {
    pub commit: CommitHash,
    pub subject: String,
    pub outcome: ActOutcome,
}

#[derive(Debug)]
pub enum ActReport {
    Set { id: String },
    Branch(Vec<ActResult>),
}

#[derive(Debug)]
pub enum StatusOutcome {
    Found(PatchStatus),
    /// The server does not know this commit.
    NoRecord,
    Failed(SyncError),
}

#[derive(Debug)]
pub struct StatusEntry {
    pub commit: CommitHash,
    pub outcome: StatusOutcome,
}

#[derive(Debug)]
pub enum StatusReport {
    /// No commit of the range resolved on the server.
    NotRecorded,
    Tracked(Vec<StatusEntry>),
}

#[derive(Debug)]
pub enum ApplyOutcome {
    Applied { path: PathBuf, output: String },
    /// The user said no; the downloaded file was removed again.
    Declined,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Binds the configuration and both collaborators to one working directory.
pub struct Orchestrator<'a> {
    config: &'a Config,
    vcs: &'a dyn Vcs,
    tracker: &'a dyn Tracker,
    dir: &'a Path,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        vcs: &'a dyn Vcs,
        tracker: &'a dyn Tracker,
        dir: &'a Path,
    ) -> Self {
        Self {
            config,
            vcs,
            tracker,
            dir,
        }
    }

    pub fn server_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn local_commits(&self) -> Result<Vec<Commit>, SyncError> {
        log_reader::read_range(self.vcs, self.dir, &self.config.range)
    }

    // -- record -------------------------------------------------------------

    /// Send the local range to the server as a new patch-set.
    pub fn record(&self, options: &RecordOptions) -> Result<RecordOutcome, SyncError> {
        let commits = self.local_commits()?;
        let payload = PatchSetPayload::new(&commits);
        let set = self
            .tracker
            .create_set(&payload.to_json()?, options.obsoletes.as_deref())?;
        tracing::info!(
            "recorded {} patches as set {} rev {}",
            payload.len(),
            set.id,
            set.revision
        );

        let upload = if options.upload {
            Some(self.upload()?)
        } else {
            None
        };

        Ok(RecordOutcome {
            patches: payload.len(),
            set,
            upload,
        })
    }

    // -- upload -------------------------------------------------------------

    /// Upload each patch of `git format-patch --stdout <range>` with its
    /// `TrackedAt:` marker embedded.
    pub fn upload(&self) -> Result<UploadReport, SyncError> {
        let stream = self
            .vcs
            .run(self.dir, &["format-patch", "--stdout", &self.config.range])?;

        let mut report = UploadReport::default();
        for segment in PatchStream::new(&stream) {
            let Some(commit) = segment.commit else {
                tracing::warn!(
                    "ignoring {} bytes before the first patch",
                    segment.body.len()
                );
                continue;
            };
            let url = provenance::patch_url(self.server_url(), commit.as_str());
            let embedded = provenance::embed(segment.body, &url);
            let outcome = self.tracker.upload_patch_body(&commit, &embedded.body);
            if let Err(err) = &outcome {
                tracing::warn!("upload of {} failed: {}", commit, err);
            }
            report.results.push(UploadResult {
                commit,
                placement: embedded.placement,
                outcome,
            });
        }
        Ok(report)
    }

    // -- download -----------------------------------------------------------

    /// Fetch every patch of a remote set into `{index}-{hash}.patch` files;
    /// with `branch`, create that branch first and `git am` each file.
    pub fn download(&self, set_id: &str, branch: Option<&str>) -> Result<DownloadReport, SyncError> {
        let set = self.tracker.fetch_set(set_id)?;

        let mut report = DownloadReport::default();
        if let Some(branch) = branch {
            report.branch_output = Some(self.vcs.run(self.dir, &["checkout", "-b", branch])?);
        }

        for (index, commit) in set.patches.into_iter().enumerate() {
            let path = writer::set_patch_path(self.dir, index, &commit);
            let outcome = match self.tracker.download_patch_body(&commit) {
                Ok(body) => {
                    writer::write_patch(&path, &body)?;
                    match branch {
                        Some(_) => DownloadOutcome::Applied {
                            output: self.apply_file(&path)?,
                        },
                        None => DownloadOutcome::Stored,
                    }
                }
                Err(err) => DownloadOutcome::Failed(err),
            };
            let stop = branch.is_some() && matches!(outcome, DownloadOutcome::Failed(_));
            report.patches.push(DownloadedPatch {
                index,
                commit,
                path,
                outcome,
            });
            if stop {
                // later patches would be applied onto an incomplete series
                break;
            }
        }
        Ok(report)
    }

    /// `git am` runs inside `self.dir`, so the patch is named relative to it.
    fn apply_file(&self, path: &Path) -> Result<String, SyncError> {
        let relative = path.strip_prefix(self.dir).unwrap_or(path);
        let relative = relative.to_string_lossy();
        self.vcs.run(self.dir, &["am", relative.as_ref()])
    }

    // -- act ----------------------------------------------------------------

    /// Send `action` for a whole set, or for every tracked commit of the range.
    pub fn act(
        &self,
        action: Action,
        scope: &ActScope,
        message: Option<&str>,
    ) -> Result<ActReport, SyncError> {
        let commits = match scope {
            ActScope::Set(id) => {
                self.tracker
                    .post_action(&ActionTarget::Set(id.clone()), action, message)?;
                return Ok(ActReport::Set { id: id.clone() });
            }
            ActScope::Branch => self.local_commits()?,
        };

        let results = commits
            .into_iter()
            .map(|commit| {
                let outcome = match provenance::extract(&commit.full_message) {
                    None => ActOutcome::NotTracked,
                    Some(url) => {
                        let target = ActionTarget::Patch(url.to_owned());
                        match self.tracker.post_action(&target, action, message) {
                            Ok(()) => ActOutcome::Done,
                            Err(err) => ActOutcome::Failed(err),
                        }
                    }
                };
                ActResult {
                    commit: commit.hash,
                    subject: commit.short_message,
                    outcome,
                }
            })
            .collect();
        Ok(ActReport::Branch(results))
    }

    // -- status -------------------------------------------------------------

    /// Remote review state of each commit in the range.
    pub fn status(&self) -> Result<StatusReport, SyncError> {
        let commits = self.local_commits()?;

        let mut entries = Vec::with_capacity(commits.len());
        let mut resolved = 0;
        for commit in commits {
            let outcome = match self.tracker.fetch_patch_status(&commit.hash) {
                Ok(Some(status)) => {
                    resolved += 1;
                    StatusOutcome::Found(status)
                }
                Ok(None) => {
                    tracing::debug!("{} has no remote record", commit.hash);
                    StatusOutcome::NoRecord
                }
                Err(err) => StatusOutcome::Failed(err),
            };
            entries.push(StatusEntry {
                commit: commit.hash,
                outcome,
            });
        }

        if resolved == 0 {
            return Ok(StatusReport::NotRecorded);
        }
        Ok(StatusReport::Tracked(entries))
    }

    // -- apply --------------------------------------------------------------

    /// Download one patch to `<hash>.patch` and, if `confirm` agrees, `git am` it.
    ///
    /// `hash` is validated before anything else happens.
    pub fn apply(
        &self,
        hash: &str,
        confirm: impl FnOnce(&Path) -> bool,
    ) -> Result<ApplyOutcome, SyncError> {
        let commit = CommitHash::parse(hash)?;
        let body = self.tracker.download_patch_body(&commit)?;
        let path = writer::single_patch_path(self.dir, &commit);
        writer::write_patch(&path, &body)?;

        if !confirm(&path) {
            let _ = std::fs::remove_file(&path);
            return Ok(ApplyOutcome::Declined);
        }

        let output = self.apply_file(&path)?;
        Ok(ApplyOutcome::Applied { path, output })
    }

    // -- obsolete -----------------------------------------------------------

    pub fn obsolete(&self, set_id: &str) -> Result<(), SyncError> {
        self.tracker.mark_obsolete(set_id)
    }

    // -- list ---------------------------------------------------------------

    /// List remote sets, optionally filtered by a status value or a
    /// `field`/`value` pair. An invalid combination fails before any request.
    pub fn list(
        &self,
        value: Option<&str>,
        field: Option<&str>,
    ) -> Result<Vec<RemotePatchSet>, SyncError> {
        let filter = ListFilter::resolve(value, field)?;
        self.tracker.list_sets(filter.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
