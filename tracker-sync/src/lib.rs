//! # tracker-sync
//!
//! Synchronizes a local commit range with a patch tracker server.
//!
//! Build an [`Orchestrator`] from a [`tracker_core::Config`], a [`Vcs`]
//! (normally [`GitCli`]) and a [`Tracker`] (normally [`HttpTracker`]), then
//! call one workflow per invocation.

pub mod client;
pub mod encoder;
pub mod error;
pub mod log_reader;
pub mod orchestrator;
pub mod patch_stream;
pub mod provenance;
pub mod vcs;
pub mod writer;

#[cfg(test)]
mod testing;

pub use client::{ActionTarget, HttpTracker, Tracker};
pub use error::SyncError;
pub use orchestrator::{
    ActOutcome, ActReport, ActResult, ActScope, ApplyOutcome, DownloadOutcome, DownloadReport,
    DownloadedPatch, Orchestrator, RecordOptions, RecordOutcome, StatusEntry, StatusOutcome,
    StatusReport, UploadReport, UploadResult,
};
pub use vcs::{GitCli, Vcs};
