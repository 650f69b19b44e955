//! Error types for tracker-sync.

use std::path::PathBuf;

use thiserror::Error;

use tracker_core::UsageError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A version-control subprocess exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    Backend {
        command: String,
        status: String,
        stderr: String,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, refused connection, TLS, …).
    #[error("connection failed: {0}")]
    Transport(String),

    /// Response or payload JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed user input.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// The structured log and the one-line log of the same range disagreed.
    #[error("commit log queries disagree at position {position}: {structured} vs {oneline}")]
    LogMismatch {
        position: usize,
        structured: String,
        oneline: String,
    },

    /// Output from git or the server did not have the expected shape.
    #[error("unexpected data: {0}")]
    InvalidData(String),
}

impl SyncError {
    /// Fatal errors end the whole invocation; the others are reported per unit of work.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Backend { .. }
                | SyncError::Usage(_)
                | SyncError::LogMismatch { .. }
                | SyncError::InvalidData(_)
        )
    }
}

impl From<ureq::Error> for SyncError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => SyncError::Http {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => SyncError::Transport(transport.to_string()),
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        let backend = SyncError::Backend {
            command: "git log".into(),
            status: "exit status: 128".into(),
            stderr: "not a git repository".into(),
        };
        assert!(backend.is_fatal());
        assert!(SyncError::Usage(UsageError::InvalidCommitHash("x".into())).is_fatal());
        assert!(!SyncError::Transport("refused".into()).is_fatal());
        assert!(!SyncError::Http {
            status: 500,
            body: String::new()
        }
        .is_fatal());
    }

    #[test]
    fn http_error_message_carries_status_and_body() {
        let err = SyncError::Http {
            status: 401,
            body: "Not authorized".into(),
        };
        assert_eq!(err.to_string(), "HTTP 401: Not authorized");
    }
}
