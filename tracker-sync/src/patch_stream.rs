//! Lazy splitter for `git format-patch --stdout` output.
//!
//! A line `From <40 hex> ` opens a new patch; every following line belongs to
//! it until the next such line. Concatenating all segment bodies in order
//! gives back the input exactly.

use tracker_core::CommitHash;

/// One piece of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// `None` only for text that precedes the first patch marker.
    pub commit: Option<CommitHash>,
    pub body: &'a str,
}

/// Iterator over the [`Segment`]s of a concatenated patch stream.
#[derive(Debug, Clone)]
pub struct PatchStream<'a> {
    rest: &'a str,
}

impl<'a> PatchStream<'a> {
    pub fn new(stream: &'a str) -> Self {
        Self { rest: stream }
    }
}

impl<'a> Iterator for PatchStream<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let commit = boundary_commit(self.rest);
        // The opening line (boundary or not) always belongs to this segment.
        let mut end = first_line_len(self.rest);
        while end < self.rest.len() {
            let line_start = &self.rest[end..];
            if boundary_commit(line_start).is_some() {
                break;
            }
            end += first_line_len(line_start);
        }

        let (body, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Segment { commit, body })
    }
}

/// The commit named by a `From <hash> ` line at the start of `text`.
pub fn boundary_commit(text: &str) -> Option<CommitHash> {
    let tail = text.strip_prefix("From ")?;
    let hash = tail.get(..CommitHash::LEN)?;
    if !tail[CommitHash::LEN..].starts_with(' ') {
        return None;
    }
    CommitHash::parse(hash).ok()
}

fn first_line_len(text: &str) -> usize {
    text.find('\n').map_or(text.len(), |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a() -> String {
        "a".repeat(40)
    }
    fn b() -> String {
        "b".repeat(40)
    }

    fn stream() -> String {
        format!(
            "From {a} Mon Sep 17 00:00:00 2001\nSubject: [PATCH 1/2] one\n\n---\ndiff\n\
             From {b} Mon Sep 17 00:00:00 2001\nSubject: [PATCH 2/2] two\n\n---\ndiff\n",
            a = a(),
            b = b()
        )
    }

    #[test]
    fn splits_at_each_marker() {
        let input = stream();
        let segments: Vec<_> = PatchStream::new(&input).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].commit.as_ref().unwrap().as_str(), a());
        assert_eq!(segments[1].commit.as_ref().unwrap().as_str(), b());
        assert!(segments[0].body.ends_with("diff\n"));
        assert!(segments[1].body.starts_with(&format!("From {}", b())));
    }

    #[test]
    fn concatenation_reproduces_input() {
        let inputs = [
            stream(),
            format!("preamble\n{}", stream()),
            format!("{}no trailing newline", stream()),
            String::new(),
            "no markers at all\n".to_string(),
        ];
        for input in inputs {
            let joined: String = PatchStream::new(&input).map(|s| s.body).collect();
            assert_eq!(joined, input);
        }
    }

    #[test]
    fn preamble_has_no_commit() {
        let input = format!("preamble\n{}", stream());
        let first = PatchStream::new(&input).next().unwrap();
        assert_eq!(first.commit, None);
        assert_eq!(first.body, "preamble\n");
    }

    #[test]
    fn from_lines_in_message_bodies_are_not_boundaries() {
        let input = format!(
            "From {a} Mon\nFrom: Ann\n\nFrom here on\nFrom {short} Mon\nFrom {a}X\n",
            a = a(),
            short = "a".repeat(39)
        );
        assert_eq!(PatchStream::new(&input).count(), 1);
    }

    #[test]
    fn boundary_accepts_uppercase_hex() {
        let line = format!("From {} Mon", "ABCDEF0123".repeat(4));
        assert!(boundary_commit(&line).is_some());
    }
}
