//! Tracker core library — domain types, client configuration, errors.
//!
//! - [`types`] — commit and remote record types, request vocabulary
//! - [`config`] — load / save / init of `~/.tracker/config.yaml`
//! - [`error`] — [`ConfigError`], [`UsageError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, Credentials};
pub use error::{ConfigError, UsageError};
pub use types::{
    Action, Commit, CommitHash, CreatedSet, ListFilter, PatchStatus, PatchStatusKind,
    RemotePatchSet, RemoteSet, Signature,
};
