//! Per-tenant storage.
//!
//! A tenant is the execution context every module runs against: its
//! identity (location, name, owner, fork origin), its per-tenant route
//! overrides and the storage of each builtin module. Tenants are never
//! dropped from the host, even after their factory record is removed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gitreg_core::{Address, Amount, Branch, Issue, IssueKey, OperationId, RepoName};

/// One change to a tenant's route overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum OverrideCut {
    /// Route `operations` to `module` for this tenant only.
    Set { module: Address, operations: Vec<OperationId> },
    /// Drop the overrides for `operations`; they fall back to the shared registry.
    Clear { operations: Vec<OperationId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BranchStore {
    /// Branch names in first-push order.
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub branches: BTreeMap<String, Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IssueStore {
    /// Issue keys in opening order; `Issue::place_in_list` indexes this.
    #[serde(default)]
    pub keys: Vec<IssueKey>,
    #[serde(default)]
    pub issues: BTreeMap<IssueKey, Issue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantStorage {
    pub location: Address,
    pub name: RepoName,
    pub owner: Address,
    pub factory: Address,
    pub forked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_origin: Option<Address>,
    #[serde(default)]
    pub overrides: BTreeMap<OperationId, Address>,
    #[serde(default)]
    pub branches: BranchStore,
    #[serde(default)]
    pub issues: IssueStore,
    #[serde(default)]
    pub tips: Amount,
}

impl TenantStorage {
    pub fn new(
        location: Address,
        name: RepoName,
        owner: Address,
        factory: Address,
        fork_origin: Option<Address>,
    ) -> Self {
        Self {
            location,
            name,
            owner,
            factory,
            forked: fork_origin.is_some(),
            fork_origin,
            overrides: BTreeMap::new(),
            branches: BranchStore::default(),
            issues: IssueStore::default(),
            tips: 0,
        }
    }

    pub fn apply_override(&mut self, cut: OverrideCut) {
        match cut {
            OverrideCut::Set { module, operations } => {
                for op in operations {
                    self.overrides.insert(op, module.clone());
                }
            }
            OverrideCut::Clear { operations } => {
                for op in &operations {
                    self.overrides.remove(op);
                }
            }
        }
    }
}
