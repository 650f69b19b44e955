//! Domain types shared by the sync engine and the CLI.
//!
//! Local side: [`CommitHash`], [`Signature`], [`Commit`].
//! Remote side: the records the tracker server returns ([`CreatedSet`],
//! [`RemoteSet`], [`RemotePatchSet`], [`PatchStatus`]).
//! Request vocabulary: [`Action`], [`ListFilter`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UsageError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A full 40-character hexadecimal git commit id.
///
/// The universal key joining local commits and remote patch records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitHash(String);

impl CommitHash {
    pub const LEN: usize = 40;

    /// Validate `s` as exactly 40 hex characters (either case).
    pub fn parse(s: &str) -> Result<Self, UsageError> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(UsageError::InvalidCommitHash(s.to_owned()))
        }
    }

    pub fn is_valid(s: &str) -> bool {
        s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last eight characters, used as the short label in console output.
    pub fn short(&self) -> &str {
        &self.0[Self::LEN - 8..]
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CommitHash {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for CommitHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Local commits
// ---------------------------------------------------------------------------

/// Author or committer identity as reported by `git log`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// ISO-like date string (`%ai` / `%ci`), passed through untouched.
    pub date: String,
    pub name: String,
    pub email: String,
}

/// One local commit inside the recorded range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: CommitHash,
    pub tree_hash: String,
    pub parent_hashes: Vec<String>,
    pub author: Signature,
    pub committer: Signature,
    pub short_message: String,
    /// Complete message body; may carry a `TrackedAt:` line.
    pub full_message: String,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Review state of a patch or patch-set on the tracker server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchStatusKind {
    New,
    Ack,
    Nack,
    Push,
    Obsolete,
    /// Any value this client does not know about.
    #[serde(other)]
    Unknown,
}

impl PatchStatusKind {
    /// Status values accepted by the `list` shorthand filter.
    pub const FILTERABLE: [PatchStatusKind; 4] = [Self::New, Self::Ack, Self::Nack, Self::Push];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Ack => "ack",
            Self::Nack => "nack",
            Self::Push => "push",
            Self::Obsolete => "obsolete",
            Self::Unknown => "unknown",
        }
    }

    /// Parse one of the filterable values (`new|ack|nack|push`).
    pub fn filterable(value: &str) -> Option<Self> {
        Self::FILTERABLE
            .into_iter()
            .find(|kind| kind.as_str() == value)
    }
}

impl fmt::Display for PatchStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client-requested review transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ack,
    Nack,
    Push,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Ack => "ack",
            Action::Nack => "nack",
            Action::Push => "push",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for the patch-set listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    /// `?filter=status&filter_value=<status>`
    Status(PatchStatusKind),
    /// `?filter=<field>&filter_value=<value>`
    Field { field: String, value: String },
}

impl ListFilter {
    /// Combine a positional filter value and an optional field name.
    ///
    /// A status value always filters on status. Anything else requires
    /// `field`; without one the combination is a [`UsageError`].
    pub fn resolve(value: Option<&str>, field: Option<&str>) -> Result<Option<Self>, UsageError> {
        let Some(value) = value else {
            return Ok(None);
        };
        if let Some(status) = PatchStatusKind::filterable(value) {
            return Ok(Some(ListFilter::Status(status)));
        }
        match field {
            Some(field) => Ok(Some(ListFilter::Field {
                field: field.to_owned(),
                value: value.to_owned(),
            })),
            None => Err(UsageError::FilterNeedsField(value.to_owned())),
        }
    }

    /// `(filter, filter_value)` query parameters.
    pub fn query_pairs(&self) -> (&str, &str) {
        match self {
            ListFilter::Status(status) => ("status", status.as_str()),
            ListFilter::Field { field, value } => (field.as_str(), value.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Remote records
// ---------------------------------------------------------------------------

/// Response of `POST /set`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedSet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub revision: String,
}

/// Response of `GET /set/{id}`; only the ordered patch list is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteSet {
    pub patches: Vec<CommitHash>,
}

/// One row of `GET /set`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePatchSet {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub status: PatchStatusKind,
    #[serde(default)]
    pub first_patch_message: String,
    #[serde(default)]
    pub num_of_patches: u64,
    #[serde(default)]
    pub author: String,
}

/// Response of `GET /patch/{commit}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatchStatus {
    pub commit: CommitHash,
    pub status: PatchStatusKind,
    #[serde(deserialize_with = "string_or_number")]
    pub revision: String,
    #[serde(default)]
    pub message: String,
}

/// Accept `"3"` or `3` — servers disagree on how ids are typed.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
