//! The complete mutable state of a host.
//!
//! `HostState` is plain data: cloning it is how an invocation is made
//! atomic, and serializing it is how a host is persisted. Module code is not
//! part of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gitreg_core::{Address, CapabilityRegistry, HostError, Ledger};

use crate::factory::FactoryState;
use crate::tenant::TenantStorage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    /// Routes shared by every tenant.
    pub repository_registry: CapabilityRegistry,
    /// Routes for factory operations.
    pub factory_registry: CapabilityRegistry,
    pub factory: FactoryState,
    #[serde(default)]
    pub tenants: BTreeMap<Address, TenantStorage>,
    #[serde(default)]
    pub ledger: Ledger,
    /// Source of fresh tenant locations.
    #[serde(default)]
    pub nonce: u64,
}

impl HostState {
    pub fn tenant(&self, location: &Address) -> Result<&TenantStorage, HostError> {
        self.tenants.get(location).ok_or(HostError::RepositoryNotFound)
    }

    pub fn tenant_mut(&mut self, location: &Address) -> Result<&mut TenantStorage, HostError> {
        self.tenants.get_mut(location).ok_or(HostError::RepositoryNotFound)
    }

    /// A location no tenant occupies yet.
    pub fn next_location(&mut self) -> Address {
        loop {
            let location = Address::derive("tenant", self.nonce);
            self.nonce += 1;
            if !self.tenants.contains_key(&location) {
                return location;
            }
        }
    }
}
