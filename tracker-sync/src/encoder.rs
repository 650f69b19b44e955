//! Wire payload for `POST /set`.
//!
//! A JSON array: one object per commit, oldest first, followed by a single
//! trailing object mapping each hash to its messages. Consumers pop the last
//! element to get the message index; everything before it is the patch list.
//!
//! ```text
//! [
//!   {"hashes":{"commit":…,"tree":…,"parents":…},"author":{…},"committer":{…}},
//!   …,
//!   {"<hash>":{"msg":…,"full_message":…}, …}
//! ]
//! ```

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use tracker_core::{Commit, Signature};

/// Borrowed view over a commit range, serialized in the wire layout.
///
/// Encoding is pure: the same commits always give byte-identical JSON.
#[derive(Debug, Clone, Copy)]
pub struct PatchSetPayload<'a> {
    commits: &'a [Commit],
}

impl<'a> PatchSetPayload<'a> {
    pub fn new(commits: &'a [Commit]) -> Self {
        Self { commits }
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `encode(commits)` as a JSON string.
pub fn encode(commits: &[Commit]) -> Result<String, serde_json::Error> {
    PatchSetPayload::new(commits).to_json()
}

impl Serialize for PatchSetPayload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.commits.len() + 1))?;
        for commit in self.commits {
            seq.serialize_element(&CommitMetadata::from(commit))?;
        }
        seq.serialize_element(&MessageIndex(self.commits))?;
        seq.end()
    }
}

#[derive(Serialize)]
struct CommitMetadata<'a> {
    hashes: Hashes<'a>,
    author: &'a Signature,
    committer: &'a Signature,
}

#[derive(Serialize)]
struct Hashes<'a> {
    commit: &'a str,
    tree: &'a str,
    /// Space-separated, as `%P` prints them.
    parents: String,
}

impl<'a> From<&'a Commit> for CommitMetadata<'a> {
    fn from(commit: &'a Commit) -> Self {
        Self {
            hashes: Hashes {
                commit: commit.hash.as_str(),
                tree: &commit.tree_hash,
                parents: commit.parent_hashes.join(" "),
            },
            author: &commit.author,
            committer: &commit.committer,
        }
    }
}

/// Hash → messages, keyed in commit order (not sorted).
struct MessageIndex<'a>(&'a [Commit]);

#[derive(Serialize)]
struct MessageEntry<'a> {
    msg: &'a str,
    full_message: &'a str,
}

impl Serialize for MessageIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for commit in self.0 {
            map.serialize_entry(
                commit.hash.as_str(),
                &MessageEntry {
                    msg: &commit.short_message,
                    full_message: &commit.full_message,
                },
            )?;
        }
        map.end()
    }
}
