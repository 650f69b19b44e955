//! Error types for tracker-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading and saving.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, unreadable file, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.tracker/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// `config init` refused to clobber an existing file.
    #[error("configuration already exists at {path}")]
    AlreadyExists { path: PathBuf },
}

/// Malformed user input, rejected before any remote call or local mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("you must provide a git commit hash (40 hexadecimal characters), got '{0}'")]
    InvalidCommitHash(String),

    #[error("to filter on '{0}' (not a status value) you must also name the filter field")]
    FilterNeedsField(String),
}
