//! Persisted client configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.tracker/
//!   config.yaml   (mode 0600: url, user, password, range)
//! ```
//!
//! # API pattern
//!
//! Locating the file is separate from reading and writing it:
//! - `config_path_at(home)` / `config_path()` — where the file lives
//! - `load_from` / `save_to` / `init_to` — take the file path, so a
//!   `--config` override and tests with `TempDir` go through the same code
//!
//! The loaded [`Config`] is built once per process and handed to every
//! component by reference; nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use base64::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_URL: &str = "http://localhost:9292";
pub const DEFAULT_USER: &str = "tracker";
pub const DEFAULT_PASSWORD: &str = "tracker";
pub const DEFAULT_RANGE: &str = "origin/master..HEAD";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Client settings; any key missing from the file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker server base URL.
    pub url: String,
    pub user: String,
    pub password: String,
    /// Commit range recorded and inspected by the branch workflows.
    pub range: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            user: DEFAULT_USER.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
            range: DEFAULT_RANGE.to_owned(),
        }
    }
}

impl Config {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            url: self.url.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// What every authenticated remote call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub user: String,
    pub password: String,
}

impl Credentials {
    /// Server URL without a trailing slash, ready for `format!("{base}/set")`.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Standard base64 of `user:password`, no line breaks.
    pub fn basic_auth(&self) -> String {
        BASE64_STANDARD.encode(format!("{}:{}", self.user, self.password))
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Basic {}", self.basic_auth())
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.tracker/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".tracker").join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read configuration from `path`, or return the defaults when it is absent.
///
/// Returns `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `config` to `path`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            set_dir_permissions(parent)?;
        }
    }
    let tmp_path = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Write the default configuration to `path` unless a file is already there.
pub fn init_to(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let config = Config::default();
    save_to(path, &config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
