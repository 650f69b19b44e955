//! Configuration load/save integration tests: defaults, partial files,
//! parse errors with path context, init refusal.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use tracker_core::{
    config::{self, Config, DEFAULT_PASSWORD, DEFAULT_RANGE},
    ConfigError,
};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn partial_file_keeps_defaults_for_missing_keys() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("tracker.yaml");
    file.write_str("url: http://tracker.example.com\nuser: mfojtik@example.com\n")
        .expect("write");

    let config = config::load_from(file.path()).expect("load");
    assert_eq!(config.url, "http://tracker.example.com");
    assert_eq!(config.user, "mfojtik@example.com");
    assert_eq!(config.password, DEFAULT_PASSWORD);
    assert_eq!(config.range, DEFAULT_RANGE);
}

#[test]
fn empty_file_yields_defaults() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("tracker.yaml");
    file.touch().expect("touch");
    assert_eq!(config::load_from(file.path()).expect("load"), Config::default());
}

#[test]
fn corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("tracker.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("tracker.yaml"), "got: {err}");
}

#[test]
fn wrong_type_yaml_returns_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("tracker.yaml");
    file.write_str("- this is a list, not a mapping\n").expect("write");

    let err = config::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Save / init
// ---------------------------------------------------------------------------

#[test]
fn save_then_load_preserves_values() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::config_path_at(home.path());
    let config = Config {
        url: "https://tracker.internal/".into(),
        user: "reviewer".into(),
        password: "s3cret".into(),
        range: "upstream/main..HEAD".into(),
    };
    config::save_to(&path, &config).expect("save");
    assert_eq!(config::load_from(&path).expect("load"), config);
}

#[test]
fn init_writes_defaults_once() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let written = config::init_to(&config::config_path_at(home.path())).expect("init");
    assert_eq!(written, Config::default());

    home.child(".tracker/config.yaml")
        .assert(predicate::str::contains("http://localhost:9292"));

    let err = config::init_to(&config::config_path_at(home.path())).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists { .. }), "got: {err}");
}

#[test]
#[cfg(unix)]
fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let home = assert_fs::TempDir::new().expect("tempdir");
    config::init_to(&config::config_path_at(home.path())).expect("init");
    let path = config::config_path_at(home.path());
    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}
