//! Factory operations: provisioning, removal, forking and lookups.

use gitreg_core::{HostError, OperationId, RepoKey};

use crate::call::{ops, Call, Reply};
use crate::module::{Invocation, Module};
use crate::tenant::TenantStorage;

#[derive(Debug, Default, Clone, Copy)]
pub struct RepositoryManagementModule;

impl Module for RepositoryManagementModule {
    fn name(&self) -> &'static str {
        "RepositoryManagement"
    }

    fn operations(&self) -> Vec<OperationId> {
        vec![
            ops::CREATE_REPOSITORY.into(),
            ops::REMOVE_REPOSITORY.into(),
            ops::FORK_REPOSITORY.into(),
            ops::GET_REPOSITORY.into(),
            ops::GET_USER_REPO_NAME_HASH.into(),
            ops::GET_REPOSITORY_NAMES.into(),
            ops::GET_USERS_REPOSITORIES.into(),
            ops::GET_REPOSITORIES_USER_LIST.into(),
        ]
    }

    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError> {
        inv.require_factory()?;
        let caller = inv.caller().clone();
        let factory = &inv.state.factory;

        match call {
            Call::CreateRepository { name } => {
                let location = inv.state.next_location();
                let record = inv.state.factory.create(&caller, &name, location.clone(), None)?;
                let factory_address = inv.state.factory.address.clone();
                inv.state.tenants.insert(
                    location.clone(),
                    TenantStorage::new(location, name, caller, factory_address, None),
                );
                Ok(Reply::Record(Some(record)))
            }
            Call::RemoveRepository { name, owner_index, name_index } => {
                inv.state.factory.remove(&caller, &name, owner_index, name_index)?;
                Ok(Reply::Unit)
            }
            Call::ForkRepository { origin } => {
                let source = factory
                    .active_record(&origin)
                    .cloned()
                    .ok_or(HostError::RepositoryNotFound)?;
                if factory.is_active(&RepoKey::of(&caller, &source.name)) {
                    return Err(HostError::ForkExists);
                }
                let location = inv.state.next_location();
                let record = inv.state.factory.create(
                    &caller,
                    &source.name,
                    location.clone(),
                    Some(source.location.clone()),
                )?;
                let factory_address = inv.state.factory.address.clone();
                inv.state.tenants.insert(
                    location.clone(),
                    TenantStorage::new(location, source.name, caller, factory_address, Some(source.location)),
                );
                Ok(Reply::Record(Some(record)))
            }
            Call::GetRepository { key } => Ok(Reply::Record(factory.record(&key).cloned())),
            Call::GetUserRepoNameHash { owner, name } => Ok(Reply::RepoKey(RepoKey::of(&owner, &name))),
            Call::GetRepositoryNames => Ok(Reply::RepoNames(factory.repository_names())),
            Call::GetUsersRepositories { owner } => Ok(Reply::RepoNames(factory.users_repositories(&owner))),
            Call::GetRepositoriesUserList { name } => {
                Ok(Reply::Addresses(factory.repositories_user_list(&name)))
            }
            _ => Err(HostError::NotRegistered),
        }
    }
}
