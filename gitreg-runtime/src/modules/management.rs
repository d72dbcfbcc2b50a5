//! Tenant self-description.

use gitreg_core::{HostError, OperationId, RepoKey};

use crate::call::{ops, Call, Reply, RepositoryInfo};
use crate::module::{Invocation, Module};

/// Serves `getRepositoryInfo()` from the live factory record.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManagementModule;

impl Module for ManagementModule {
    fn name(&self) -> &'static str {
        "GitRepositoryManagement"
    }

    fn operations(&self) -> Vec<OperationId> {
        vec![ops::GET_REPOSITORY_INFO.into()]
    }

    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError> {
        match call {
            Call::GetRepositoryInfo => {
                let tenant = inv.tenant()?;
                let record = inv
                    .state
                    .factory
                    .record(&RepoKey::of(&tenant.owner, &tenant.name))
                    .filter(|r| r.location == tenant.location);
                Ok(Reply::Info(RepositoryInfo {
                    name: tenant.name.clone(),
                    owner: tenant.owner.clone(),
                    factory: tenant.factory.clone(),
                    owner_index: record.map(|r| r.owner_index).unwrap_or_default(),
                    name_index: record.map(|r| r.name_index).unwrap_or_default(),
                    is_active: record.is_some_and(|r| r.is_active),
                    forked: tenant.forked,
                    fork_origin: tenant.fork_origin.clone(),
                }))
            }
            _ => Err(HostError::NotRegistered),
        }
    }
}
