//! # gitreg-runtime
//!
//! The repository host: tenant factory, per-tenant storage, operation
//! dispatch through the two capability registries, and the builtin modules.
//!
//! Deploy a [`Host`] from a [`DeploymentManifest`], then drive it with
//! [`Host::invoke`] / [`Host::invoke_factory`] or the typed
//! [`Host::repo`] / [`Host::factory`] clients.

pub mod call;
pub mod catalog;
pub mod client;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod host;
pub mod index;
pub mod manifest;
pub mod module;
pub mod modules;
pub mod persist;
pub mod state;
pub mod tenant;

pub use call::{ops, Call, CallContext, Reply, RepositoryInfo};
pub use catalog::{module_address, ModuleAbi, ModuleCatalog};
pub use client::{FactoryClient, RepoClient};
pub use error::RuntimeError;
pub use factory::FactoryState;
pub use host::Host;
pub use manifest::{DeploymentManifest, ManifestEntry};
pub use module::{Invocation, Module, Scope};
pub use persist::{HostFile, SavedHost};
pub use state::HostState;
pub use tenant::{OverrideCut, TenantStorage};
