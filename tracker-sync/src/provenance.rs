//! The `TrackedAt:` provenance marker.
//!
//! Grammar, one line inside a commit message or mail body:
//!
//! ```text
//! marker = "TrackedAt: " url EOL
//! ```
//!
//! Upload embeds the marker into each diff body just above the `---` line
//! that separates the commit message from the diffstat. Once the patch is
//! applied with `git am`, the marker lives in the commit message, which is
//! where [`extract`] looks for it.

pub const MARKER_PREFIX: &str = "TrackedAt: ";

const BOUNDARY: &str = "---";

/// Where [`embed`] put the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Immediately before the first `---` line.
    BeforeBoundary,
    /// No `---` line: after the mail header block, or at the top.
    Fallback,
}

/// A diff body carrying the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedded {
    pub body: String,
    pub placement: Placement,
}

/// Tracking URL of one patch: `<base>/patch/<commit>`.
pub fn patch_url(base_url: &str, commit: &str) -> String {
    format!("{}/patch/{commit}", base_url.trim_end_matches('/'))
}

/// Insert `TrackedAt: <url>` followed by a blank line before the first line
/// consisting solely of `---`.
pub fn embed(diff_body: &str, tracking_url: &str) -> Embedded {
    let marker = format!("{MARKER_PREFIX}{tracking_url}\n\n");

    if let Some(offset) = line_offset(diff_body, |line| line == BOUNDARY) {
        return Embedded {
            body: splice(diff_body, offset, &marker),
            placement: Placement::BeforeBoundary,
        };
    }

    // The mail headers end at the first empty line; the message starts after it.
    let offset = line_offset(diff_body, str::is_empty)
        .map(|blank| blank + line_len_at(diff_body, blank))
        .unwrap_or(0);
    tracing::warn!(
        "diff body has no `---` boundary; marker placed at byte {}",
        offset
    );
    Embedded {
        body: splice(diff_body, offset, &marker),
        placement: Placement::Fallback,
    }
}

/// Return the URL of the first `TrackedAt:` line in `message`, if any.
///
/// An absent marker is the normal state of a commit never recorded.
pub fn extract(message: &str) -> Option<&str> {
    message
        .lines()
        .filter_map(|line| line.trim_end().strip_prefix(MARKER_PREFIX))
        .map(str::trim)
        .find(|url| !url.is_empty())
}

/// Byte offset of the first line (without its terminator) matching `pred`.
fn line_offset(text: &str, pred: impl Fn(&str) -> bool) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if pred(line.trim_end_matches(['\n', '\r'])) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn line_len_at(text: &str, offset: usize) -> usize {
    text[offset..]
        .split_inclusive('\n')
        .next()
        .map_or(0, str::len)
}

fn splice(text: &str, offset: usize, insert: &str) -> String {
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..offset]);
    out.push_str(insert);
    out.push_str(&text[offset..]);
    out
}
