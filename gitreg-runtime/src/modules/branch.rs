//! Branch heads per tenant, with read-through to a fork's origin.

use gitreg_core::{Address, Branch, HostError, OperationId};

use crate::call::{ops, Call, Reply};
use crate::module::{Invocation, Module};
use crate::state::HostState;
use crate::tenant::TenantStorage;

#[derive(Debug, Default, Clone, Copy)]
pub struct BranchModule;

impl Module for BranchModule {
    fn name(&self) -> &'static str {
        "GitBranch"
    }

    fn operations(&self) -> Vec<OperationId> {
        vec![ops::PUSH.into(), ops::GET_BRANCH.into(), ops::GET_BRANCH_NAMES.into()]
    }

    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError> {
        match call {
            Call::Push { branch, head } => {
                if branch.is_empty() {
                    return Err(HostError::EmptyBranchName);
                }
                if head.as_str().is_empty() {
                    return Err(HostError::EmptyContentId);
                }
                let caller = inv.caller().clone();
                let tenant = inv.tenant_mut()?;
                if tenant.owner != caller {
                    return Err(HostError::NotRepositoryOwner);
                }
                let store = &mut tenant.branches;
                match store.branches.get_mut(&branch) {
                    Some(existing) => existing.head_cid = head.clone(),
                    None => {
                        store.names.push(branch.clone());
                        store.branches.insert(
                            branch.clone(),
                            Branch { name: branch.clone(), head_cid: head.clone(), is_active: true },
                        );
                    }
                }
                tracing::info!(repo = %tenant.location, branch = %branch, head = %head, "branch pushed");
                Ok(Reply::Unit)
            }
            Call::GetBranch { branch } => {
                let found = lookup_branch(inv.state, inv.tenant()?, &branch);
                Ok(Reply::Branch(found.unwrap_or_default()))
            }
            Call::GetBranchNames => Ok(Reply::BranchNames(branch_names(inv.state, inv.tenant()?))),
            _ => Err(HostError::NotRegistered),
        }
    }
}

/// Fork ancestry of `tenant`, nearest first, starting with the tenant itself.
/// Stops at a missing or repeated location.
fn lineage<'s>(state: &'s HostState, tenant: &'s TenantStorage) -> Vec<&'s TenantStorage> {
    let mut chain = vec![tenant];
    let mut seen: Vec<&Address> = vec![&tenant.location];
    let mut origin = tenant.fork_origin.as_ref();
    while let Some(location) = origin {
        if seen.contains(&location) {
            break;
        }
        let Some(next) = state.tenants.get(location) else {
            break;
        };
        seen.push(location);
        chain.push(next);
        origin = next.fork_origin.as_ref();
    }
    chain
}

fn lookup_branch(state: &HostState, tenant: &TenantStorage, branch: &str) -> Option<Branch> {
    lineage(state, tenant)
        .into_iter()
        .find_map(|t| t.branches.branches.get(branch).cloned())
}

/// Origin names first, then names only this tenant has, each in push order.
fn branch_names(state: &HostState, tenant: &TenantStorage) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for t in lineage(state, tenant).into_iter().rev() {
        for name in &t.branches.names {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}
