//! State-file error-message, atomic-write-safety and envelope integration tests.
//! Storage: ~/.gitreg/state.yaml

use assert_fs::prelude::*;
use gitreg_core::{
    store::{self, StateFile},
    StoreError,
};
use predicates::prelude::predicate;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Sample {
    repos: Vec<String>,
}

fn sample() -> StateFile<Sample> {
    StateFile::new(Sample { repos: vec!["TestRepo".to_string()] })
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn load_missing_state_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let err = store::load_state_at::<Sample>(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::RegistryNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("registry not found"));
    assert!(err.to_string().contains("state.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".gitreg/state.yaml")
        .write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = store::load_state_at::<Sample>(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("state.yaml"), "must contain file path, got: {msg}");
}

#[test]
fn load_wrong_shape_returns_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".gitreg/state.yaml")
        .write_str("- this is a list, not a mapping\n")
        .expect("write");

    let err = store::load_state_at::<Sample>(home.path()).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Atomic write safety
// ---------------------------------------------------------------------------

#[test]
fn save_creates_state_file_with_private_mode() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut file = sample();
    store::save_state_at(home.path(), &mut file).expect("save");

    home.child(".gitreg/state.yaml").assert(predicate::path::exists());
    home.child(".gitreg/state.yaml.tmp").assert(predicate::path::missing());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let path = store::state_path_at(home.path());
        let mode = fs::metadata(&path).expect("meta").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "expected 0600, got {mode:o}");
    }
}

#[test]
fn mid_write_crash_leaves_original_intact() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut file = sample();
    store::save_state_at(home.path(), &mut file).expect("save");

    let path = store::state_path_at(home.path());
    let original_bytes = fs::read(&path).expect("read original");

    // Simulate crash: .tmp written but process died before rename
    let tmp = path.with_file_name("state.yaml.tmp");
    fs::write(&tmp, b"CRASH - INCOMPLETE WRITE").expect("write crash tmp");

    let current_bytes = fs::read(&path).expect("read after crash");
    assert_eq!(original_bytes, current_bytes, "original must be unchanged after crash");

    let loaded = store::load_state_at::<Sample>(home.path()).expect("load");
    assert_eq!(loaded.state, file.state);
}

#[test]
fn resave_bumps_updated_at_only() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let mut file = sample();
    store::save_state_at(home.path(), &mut file).expect("first save");
    let created = file.created_at;
    let first_update = file.updated_at;

    store::save_state_at(home.path(), &mut file).expect("second save");
    let loaded = store::load_state_at::<Sample>(home.path()).expect("load");
    assert_eq!(loaded.created_at, created);
    assert!(loaded.updated_at >= first_update);
}
