//! gitreg core library: domain types, errors, routing tables, value ledger,
//! tick sources, configuration and state persistence.
//!
//! Public API surface:
//! - [`types`]: newtypes and domain structs
//! - [`error`]: [`HostError`] (wire-visible) and [`StoreError`]
//! - [`capability`]: [`CapabilityRegistry`]
//! - [`ownable`], [`ledger`], [`clock`]: host primitives
//! - [`config`], [`store`]: `~/.gitreg/` files

pub mod capability;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod ownable;
pub mod store;
pub mod types;

pub use capability::{CapabilityRegistry, Route};
pub use clock::{EpochClock, ManualClock, TickSource};
pub use config::HostConfig;
pub use error::{ErrorKind, HostError, StoreError};
pub use ledger::Ledger;
pub use ownable::Ownable;
pub use store::StateFile;
pub use types::{
    Address, Amount, Answer, Branch, Cid, Issue, IssueKey, IssueState, ModuleCut, OperationId,
    RepoKey, RepoName, TenantRecord, Tick,
};
