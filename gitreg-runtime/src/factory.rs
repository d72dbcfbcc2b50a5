//! Tenant records and the factory's index structures.
//!
//! # Indices
//!
//! ```text
//! records        RepoKey(owner, name) → TenantRecord   (never hard-deleted)
//! owner_repos    owner → [name, …]                     record.owner_index
//! name_owners    name  → NameEntry { position, [owner, …] }  record.name_index
//! names          [name, …]                             NameEntry.position
//! ```
//!
//! Every stored index equals the live position of its element after each
//! mutation. Removal goes through [`PositionedList::swap_remove`] so the
//! element moved into a freed slot has its stored index rewritten in the
//! same step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gitreg_core::{Address, Amount, HostError, Ownable, RepoKey, RepoName, TenantRecord};

use crate::index::PositionedList;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Position of the name in the global name list.
    pub position: usize,
    pub owners: PositionedList<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryState {
    pub address: Address,
    ownership: Ownable,
    #[serde(default)]
    tips: Amount,
    #[serde(default)]
    records: BTreeMap<RepoKey, TenantRecord>,
    #[serde(default)]
    owner_repos: BTreeMap<Address, PositionedList<RepoName>>,
    #[serde(default)]
    name_owners: BTreeMap<RepoName, NameEntry>,
    #[serde(default)]
    names: PositionedList<RepoName>,
}

impl FactoryState {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            ownership: Ownable::new(owner),
            tips: 0,
            records: BTreeMap::new(),
            owner_repos: BTreeMap::new(),
            name_owners: BTreeMap::new(),
            names: PositionedList::default(),
        }
    }

    pub fn ownership(&self) -> &Ownable {
        &self.ownership
    }

    pub fn ownership_mut(&mut self) -> &mut Ownable {
        &mut self.ownership
    }

    pub fn tips(&self) -> Amount {
        self.tips
    }

    pub fn add_tips(&mut self, amount: Amount) {
        self.tips = self.tips.saturating_add(amount);
    }

    /// Zero the tip pool, returning what it held.
    pub fn take_tips(&mut self) -> Amount {
        std::mem::take(&mut self.tips)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Register a tenant for `(owner, name)` at `location`.
    ///
    /// Fails with `AlreadyExists` when an active record for the pair exists.
    /// An inactive record under the same key is overwritten.
    pub fn create(
        &mut self,
        owner: &Address,
        name: &RepoName,
        location: Address,
        fork_origin: Option<Address>,
    ) -> Result<TenantRecord, HostError> {
        let key = RepoKey::of(owner, name);
        if self.is_active(&key) {
            return Err(match fork_origin {
                Some(_) => HostError::ForkExists,
                None => HostError::AlreadyExists,
            });
        }

        let owner_index = self.owner_repos.entry(owner.clone()).or_default().push(name.clone());
        let names = &mut self.names;
        let entry = self.name_owners.entry(name.clone()).or_insert_with(|| NameEntry {
            position: names.push(name.clone()),
            owners: PositionedList::default(),
        });
        let name_index = entry.owners.push(owner.clone());

        let record = TenantRecord {
            name: name.clone(),
            owner: owner.clone(),
            location,
            is_active: true,
            owner_index,
            name_index,
            forked: fork_origin.is_some(),
            fork_origin,
        };
        self.records.insert(key.clone(), record.clone());
        tracing::info!(
            repo = %key,
            owner = %owner,
            name = %name,
            location = %record.location,
            forked = record.forked,
            "repository created"
        );
        Ok(record)
    }

    /// Soft-delete the caller's record for `name`.
    ///
    /// The supplied indices must match the live ones, checked owner list
    /// first. Both lists are swap-and-popped; when the name loses its last
    /// owner it is swap-and-popped out of the global name list as well.
    pub fn remove(
        &mut self,
        caller: &Address,
        name: &RepoName,
        owner_index: usize,
        name_index: usize,
    ) -> Result<TenantRecord, HostError> {
        let key = RepoKey::of(caller, name);
        let record = self
            .records
            .get(&key)
            .filter(|r| r.is_active)
            .ok_or(HostError::RepositoryNotFound)?;
        if record.owner_index != owner_index {
            return Err(HostError::BadOwnerIndex);
        }
        if record.name_index != name_index {
            return Err(HostError::BadNameIndex);
        }

        let records = &mut self.records;

        let owned = self.owner_repos.get_mut(caller).ok_or(HostError::BadOwnerIndex)?;
        owned.swap_remove(owner_index, |moved, position| {
            if let Some(r) = records.get_mut(&RepoKey::of(caller, moved)) {
                r.owner_index = position;
            }
        })?;
        if owned.is_empty() {
            self.owner_repos.remove(caller);
        }

        let entry = self.name_owners.get_mut(name).ok_or(HostError::BadNameIndex)?;
        entry.owners.swap_remove(name_index, |moved, position| {
            if let Some(r) = records.get_mut(&RepoKey::of(moved, name)) {
                r.name_index = position;
            }
        })?;
        if entry.owners.is_empty() {
            let position = entry.position;
            self.name_owners.remove(name);
            let name_owners = &mut self.name_owners;
            self.names.swap_remove(position, |moved, new_position| {
                if let Some(e) = name_owners.get_mut(moved) {
                    e.position = new_position;
                }
            })?;
        }

        let record = records.get_mut(&key).ok_or(HostError::RepositoryNotFound)?;
        record.is_active = false;
        tracing::info!(repo = %key, owner = %caller, name = %name, "repository removed");
        Ok(record.clone())
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// The record stored under `key`, active or not.
    pub fn record(&self, key: &RepoKey) -> Option<&TenantRecord> {
        self.records.get(key)
    }

    /// The record under `key` only while it is active.
    pub fn active_record(&self, key: &RepoKey) -> Option<&TenantRecord> {
        self.records.get(key).filter(|r| r.is_active)
    }

    pub fn is_active(&self, key: &RepoKey) -> bool {
        self.active_record(key).is_some()
    }

    /// The record whose tenant lives at `location`.
    pub fn record_at(&self, location: &Address) -> Option<&TenantRecord> {
        self.records.values().find(|r| &r.location == location)
    }

    pub fn records(&self) -> impl Iterator<Item = &TenantRecord> {
        self.records.values()
    }

    /// Every name with at least one active tenant.
    pub fn repository_names(&self) -> Vec<RepoName> {
        self.names.to_vec()
    }

    /// Names `owner` holds active tenants under, in owner-index order.
    pub fn users_repositories(&self, owner: &Address) -> Vec<RepoName> {
        self.owner_repos.get(owner).map(PositionedList::to_vec).unwrap_or_default()
    }

    /// Owners holding an active tenant named `name`, in name-index order.
    pub fn repositories_user_list(&self, name: &RepoName) -> Vec<Address> {
        self.name_owners
            .get(name)
            .map(|e| e.owners.to_vec())
            .unwrap_or_default()
    }
}
