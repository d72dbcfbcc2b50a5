//! On-disk persistence of host state and configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.gitreg/             (mode 0700)
//!   config.yaml          (optional: HostConfig, defaults when absent)
//!   state.yaml           (mode 0600: StateFile envelope around the host state)
//! ```
//!
//! # API pattern
//!
//! Every function touching the filesystem has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Current envelope format version.
pub const STATE_VERSION: u32 = 1;

/// Versioned envelope written around a persisted state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile<T> {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: T,
}

impl<T> StateFile<T> {
    pub fn new(state: T) -> Self {
        let now = Utc::now();
        Self { version: STATE_VERSION, created_at: now, updated_at: now, state }
    }
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// The user's home directory, which holds `.gitreg/`.
pub fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

/// `<home>/.gitreg/`: pure, no I/O.
pub fn root_path_at(home: &Path) -> PathBuf {
    home.join(".gitreg")
}

/// `<home>/.gitreg/`, created with mode `0700` if it does not yet exist.
pub fn root_dir_at(home: &Path) -> Result<PathBuf, StoreError> {
    let dir = root_path_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.gitreg/state.yaml`: pure, no I/O.
pub fn state_path_at(home: &Path) -> PathBuf {
    root_path_at(home).join("state.yaml")
}

/// `<home>/.gitreg/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    root_path_at(home).join("config.yaml")
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load and parse a YAML document.
///
/// Returns `StoreError::RegistryNotFound` if absent,
/// `StoreError::Parse` (with path + line context) if malformed YAML.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::RegistryNotFound { path: path.to_path_buf() });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the persisted state envelope from `<home>/.gitreg/state.yaml`.
pub fn load_state_at<T: DeserializeOwned>(home: &Path) -> Result<StateFile<T>, StoreError> {
    load_yaml(&state_path_at(home))
}

/// `load_state_at` convenience wrapper.
pub fn load_state<T: DeserializeOwned>() -> Result<StateFile<T>, StoreError> {
    load_state_at(&home()?)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `value` as YAML to `path`.
///
/// Write flow: serialize → `.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem: no EXDEV).
pub fn save_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state.yaml".to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let yaml = serde_yaml::to_string(value)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Persist `file` to `<home>/.gitreg/state.yaml`, bumping `updated_at`.
pub fn save_state_at<T: Serialize>(home: &Path, file: &mut StateFile<T>) -> Result<(), StoreError> {
    root_dir_at(home)?;
    file.updated_at = Utc::now();
    let path = state_path_at(home);
    save_yaml(&path, file)?;
    tracing::debug!(path = %path.display(), "state saved");
    Ok(())
}

/// `save_state_at` convenience wrapper.
pub fn save_state<T: Serialize>(file: &mut StateFile<T>) -> Result<(), StoreError> {
    save_state_at(&home()?, file)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
