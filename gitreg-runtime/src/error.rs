//! Error types for gitreg-runtime.

use thiserror::Error;

use gitreg_core::error::{HostError, StoreError};

/// Everything that can fail while deploying, loading or saving a host.
///
/// Failures of individual operations are [`HostError`]s and are returned as
/// such by [`crate::Host::invoke`]; this type only wraps them where a
/// host-level workflow (deploy, persist) is involved.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// An operation rejected by the host.
    #[error("{0}")]
    Host(#[from] HostError),

    /// Reading or writing `~/.gitreg/` failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A manifest names a module the catalog does not contain.
    #[error("unknown module `{0}` in deployment manifest")]
    UnknownModule(String),

    /// ABI JSON serialization error.
    #[error("ABI JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
