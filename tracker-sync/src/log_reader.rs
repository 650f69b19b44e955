//! Enumerate the commits of a range through the version-control backend.
//!
//! Two independent queries run against the same range, both in `--reverse`
//! (oldest-first) order: a structured one carrying hashes and identities, and
//! a one-line one carrying subjects. They must agree on membership and order;
//! a disagreement is a [`SyncError::LogMismatch`]. Full messages are then
//! fetched per commit.

use std::path::Path;

use tracker_core::{Commit, CommitHash, Signature};

use crate::error::SyncError;
use crate::vcs::Vcs;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// `%H %T %P %ai %an %ae %ci %cn %ce`, unit-separated, record-terminated.
const STRUCTURED_FORMAT: &str = "--format=%H%x1f%T%x1f%P%x1f%ai%x1f%an%x1f%ae%x1f%ci%x1f%cn%x1f%ce%x1e";

/// Read every commit in `range` (e.g. `origin/master..HEAD`), oldest first.
///
/// Any backend failure is returned as-is; there is no partial result.
pub fn read_range(vcs: &dyn Vcs, dir: &Path, range: &str) -> Result<Vec<Commit>, SyncError> {
    let structured = vcs.run(dir, &["log", "--reverse", STRUCTURED_FORMAT, range])?;
    let oneline = vcs.run(dir, &["log", "--reverse", "--pretty=oneline", range])?;

    let records = parse_structured(&structured)?;
    let subjects = parse_oneline(&oneline)?;

    if records.len() != subjects.len() {
        return Err(SyncError::LogMismatch {
            position: records.len().min(subjects.len()),
            structured: format!("{} commits", records.len()),
            oneline: format!("{} commits", subjects.len()),
        });
    }

    let mut commits = Vec::with_capacity(records.len());
    for (position, (record, (hash, subject))) in records.into_iter().zip(subjects).enumerate() {
        if record.hash != hash {
            return Err(SyncError::LogMismatch {
                position,
                structured: record.hash.to_string(),
                oneline: hash.to_string(),
            });
        }
        let full_message = vcs.run(dir, &["log", "-1", "--format=%B", hash.as_str()])?;
        commits.push(Commit {
            hash,
            tree_hash: record.tree_hash,
            parent_hashes: record.parent_hashes,
            author: record.author,
            committer: record.committer,
            short_message: subject,
            full_message,
        });
    }

    tracing::debug!("read {} commits from {}", commits.len(), range);
    Ok(commits)
}

struct Record {
    hash: CommitHash,
    tree_hash: String,
    parent_hashes: Vec<String>,
    author: Signature,
    committer: Signature,
}

fn parse_structured(output: &str) -> Result<Vec<Record>, SyncError> {
    output
        .split(RECORD_SEP)
        .map(|chunk| chunk.trim_matches(|c| c == '\n' || c == '\r'))
        .filter(|chunk| !chunk.is_empty())
        .map(parse_record)
        .collect()
}

fn parse_record(chunk: &str) -> Result<Record, SyncError> {
    let fields: Vec<&str> = chunk.split(FIELD_SEP).collect();
    let [hash, tree, parents, a_date, a_name, a_email, c_date, c_name, c_email] = fields[..]
    else {
        return Err(SyncError::InvalidData(format!(
            "expected 9 log fields, got {}: {chunk:?}",
            fields.len()
        )));
    };

    Ok(Record {
        hash: CommitHash::parse(hash)?,
        tree_hash: tree.to_owned(),
        parent_hashes: parents.split_whitespace().map(str::to_owned).collect(),
        author: Signature {
            date: a_date.to_owned(),
            name: a_name.to_owned(),
            email: a_email.to_owned(),
        },
        committer: Signature {
            date: c_date.to_owned(),
            name: c_name.to_owned(),
            email: c_email.to_owned(),
        },
    })
}

fn parse_oneline(output: &str) -> Result<Vec<(CommitHash, String)>, SyncError> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> Result<(CommitHash, String), SyncError> {
            let (hash, subject) = line.split_once(' ').unwrap_or((line, ""));
            Ok((CommitHash::parse(hash.trim())?, subject.trim().to_owned()))
        })
        .collect()
}
