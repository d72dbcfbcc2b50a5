//! Error types for gitreg-core.
//!
//! [`HostError`] is what callers of the host observe. Its display strings are
//! the wire-visible error codes existing clients match on, so they must not
//! change. [`StoreError`] covers loading and saving state on disk.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`HostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    NotFound,
    StateConflict,
    IndexMismatch,
    Validation,
    UnsupportedOperation,
    Funds,
}

/// Every way a host operation can fail. Any of these aborts the whole
/// operation with no state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Ownable: caller is not the owner")]
    NotContractOwner,

    #[error("Ownable: new owner is the zero address")]
    ZeroOwner,

    #[error("Only owner of repository is able to push")]
    NotRepositoryOwner,

    #[error("You are not allowd to perform this action")]
    NotAllowed,

    #[error("You don't have the permission to close this issue")]
    NoPermission,

    #[error("No contract registered")]
    NotRegistered,

    #[error("Repository doesn't exist")]
    RepositoryNotFound,

    #[error("Issue with given cid does not exist")]
    IssueNotFound,

    #[error("Repository exists already")]
    AlreadyExists,

    #[error("Forking not possible. Repository exists already")]
    ForkExists,

    #[error("Open issue exists already")]
    AlreadyOpen,

    #[error("Can't resolve the issue")]
    CannotResolve,

    #[error("Can't close the issue")]
    CannotClose,

    #[error("Issue is closed already")]
    IssueClosed,

    #[error("User Index value is not correct")]
    BadOwnerIndex,

    #[error("Repo Index value is not correct")]
    BadNameIndex,

    #[error("Index out of bounds")]
    IndexOutOfBounds,

    #[error("No branch name provided")]
    EmptyBranchName,

    #[error("No CID provided")]
    EmptyContentId,

    #[error("Forked repository does not support this function")]
    NotSupportedOnFork,

    #[error("Function is not available in this scope")]
    WrongScope,

    #[error("Function is not payable")]
    NotPayable,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Function returned unexpected data")]
    UnexpectedReply,
}

impl HostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostError::NotContractOwner
            | HostError::NotRepositoryOwner
            | HostError::NotAllowed
            | HostError::NoPermission => ErrorKind::Authorization,
            HostError::NotRegistered | HostError::RepositoryNotFound | HostError::IssueNotFound => {
                ErrorKind::NotFound
            }
            HostError::AlreadyExists
            | HostError::ForkExists
            | HostError::AlreadyOpen
            | HostError::CannotResolve
            | HostError::CannotClose
            | HostError::IssueClosed => ErrorKind::StateConflict,
            HostError::BadOwnerIndex | HostError::BadNameIndex | HostError::IndexOutOfBounds => {
                ErrorKind::IndexMismatch
            }
            HostError::EmptyBranchName | HostError::EmptyContentId | HostError::ZeroOwner => {
                ErrorKind::Validation
            }
            HostError::NotSupportedOnFork
            | HostError::WrongScope
            | HostError::NotPayable
            | HostError::UnexpectedReply => ErrorKind::UnsupportedOperation,
            HostError::InsufficientBalance => ErrorKind::Funds,
        }
    }
}

/// Errors from reading or writing host state and configuration files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.gitreg/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The state file did not exist at the expected path.
    #[error("registry not found at {path}")]
    RegistryNotFound { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
