//! Operation → module routing table.
//!
//! A [`CapabilityRegistry`] owns two views of the same bindings:
//! - `routes`: the lookup used on every invocation, operation id → module
//! - `cuts`: the ordered list of module bindings as they were supplied,
//!   used for enumeration and index-addressed replacement/removal
//!
//! Every mutation keeps both views consistent: an operation id appears in
//! exactly one cut iff it has a route, and cuts never end up empty.
//!
//! The `forwarded` flag on a binding decides whether forked tenants inherit
//! it. The factory-scope registry never serves forked tenants, so its flags
//! are ignored there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::ownable::Ownable;
use crate::types::{Address, ModuleCut, OperationId};

/// Where an operation is routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub module: Address,
    pub forwarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRegistry {
    ownership: Ownable,
    #[serde(default)]
    cuts: Vec<ModuleCut>,
    #[serde(default)]
    routes: BTreeMap<OperationId, Route>,
}

impl CapabilityRegistry {
    /// Build a registry owned by `owner` with its initial bindings. Later
    /// cuts win over earlier ones for the same operation id.
    pub fn new(owner: Address, initial: Vec<ModuleCut>) -> Self {
        let mut registry = Self {
            ownership: Ownable::new(owner),
            cuts: Vec::new(),
            routes: BTreeMap::new(),
        };
        for cut in initial {
            registry.bind(cut.module, &cut.operations, cut.forwarded);
        }
        registry
    }

    pub fn ownership(&self) -> &Ownable {
        &self.ownership
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<(), HostError> {
        self.ownership.transfer_ownership(caller, new_owner)
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), HostError> {
        self.ownership.renounce_ownership(caller)
    }

    // -----------------------------------------------------------------------
    // Mutation (owner only)
    // -----------------------------------------------------------------------

    /// Route `operations` to `module`, replacing any previous route for them.
    pub fn add_entry(
        &mut self,
        caller: &Address,
        module: Address,
        operations: &[OperationId],
        forwarded: bool,
    ) -> Result<(), HostError> {
        self.ownership.only_owner(caller)?;
        tracing::info!(module = %module, operations = operations.len(), forwarded, "registry entry added");
        self.bind(module, operations, forwarded);
        Ok(())
    }

    /// Swap the binding at `index` for `cut`. Operations of the old binding
    /// that `cut` does not name become unregistered.
    pub fn replace_entry(
        &mut self,
        caller: &Address,
        cut: ModuleCut,
        index: usize,
    ) -> Result<(), HostError> {
        self.ownership.only_owner(caller)?;
        if index >= self.cuts.len() {
            return Err(HostError::IndexOutOfBounds);
        }
        let placeholder = ModuleCut {
            module: cut.module.clone(),
            operations: Vec::new(),
            forwarded: cut.forwarded,
        };
        let old = std::mem::replace(&mut self.cuts[index], placeholder);
        for op in &old.operations {
            self.routes.remove(op);
        }
        for op in &cut.operations {
            self.detach(op);
            self.routes.insert(
                op.clone(),
                Route { module: cut.module.clone(), forwarded: cut.forwarded },
            );
        }
        let to = cut.module;
        self.cuts[index].operations = cut.operations;
        self.prune();
        tracing::info!(index, from = %old.module, to = %to, "registry entry replaced");
        Ok(())
    }

    /// Unroute `operations`. Ids that are not registered are ignored.
    pub fn remove_entry(&mut self, caller: &Address, operations: &[OperationId]) -> Result<(), HostError> {
        self.ownership.only_owner(caller)?;
        let mut removed = 0usize;
        for op in operations {
            if self.routes.remove(op).is_some() {
                self.detach(op);
                removed += 1;
            }
        }
        self.prune();
        tracing::info!(requested = operations.len(), removed, "registry entries removed");
        Ok(())
    }

    /// Drop the whole binding at `index`; the last binding takes its slot.
    pub fn remove_entry_at(&mut self, caller: &Address, index: usize) -> Result<ModuleCut, HostError> {
        self.ownership.only_owner(caller)?;
        if index >= self.cuts.len() {
            return Err(HostError::IndexOutOfBounds);
        }
        let cut = self.cuts.swap_remove(index);
        for op in &cut.operations {
            self.routes.remove(op);
        }
        tracing::info!(index, module = %cut.module, "registry binding removed");
        Ok(cut)
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// Module handling `operation`. With `forked` set, bindings that are not
    /// forwarded are excluded and reported as unsupported on forks.
    pub fn resolve(&self, operation: &OperationId, forked: bool) -> Result<&Address, HostError> {
        match self.routes.get(operation) {
            None => Err(HostError::NotRegistered),
            Some(route) if forked && !route.forwarded => Err(HostError::NotSupportedOnFork),
            Some(route) => Ok(&route.module),
        }
    }

    pub fn route(&self, operation: &OperationId) -> Option<&Route> {
        self.routes.get(operation)
    }

    pub fn entries(&self) -> &[ModuleCut] {
        &self.cuts
    }

    /// Distinct module addresses in binding order.
    pub fn module_addresses(&self) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::new();
        for cut in &self.cuts {
            if !out.contains(&cut.module) {
                out.push(cut.module.clone());
            }
        }
        out
    }

    pub fn operations_of(&self, module: &Address) -> Vec<OperationId> {
        self.cuts
            .iter()
            .filter(|c| &c.module == module)
            .flat_map(|c| c.operations.iter().cloned())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn bind(&mut self, module: Address, operations: &[OperationId], forwarded: bool) {
        for op in operations {
            self.detach(op);
            self.routes.insert(op.clone(), Route { module: module.clone(), forwarded });
        }
        match self
            .cuts
            .iter_mut()
            .find(|c| c.module == module && c.forwarded == forwarded)
        {
            Some(cut) => cut.operations.extend(operations.iter().cloned()),
            None => self.cuts.push(ModuleCut {
                module,
                operations: operations.to_vec(),
                forwarded,
            }),
        }
        self.prune();
    }

    /// Remove `op` from whichever cut lists it. Leaves empty cuts in place.
    fn detach(&mut self, op: &OperationId) {
        for cut in &mut self.cuts {
            cut.operations.retain(|o| o != op);
        }
    }

    fn prune(&mut self) {
        self.cuts.retain(|c| !c.operations.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::from("0xowner")
    }
    fn ops(ids: &[&str]) -> Vec<OperationId> {
        ids.iter().map(|s| OperationId::from(*s)).collect()
    }
    fn cut(module: &str, ids: &[&str], forwarded: bool) -> ModuleCut {
        ModuleCut { module: Address::from(module), operations: ops(ids), forwarded }
    }

    fn sample() -> CapabilityRegistry {
        CapabilityRegistry::new(
            owner(),
            vec![cut("0xmgmt", &["info()"], true), cut("0xtips", &["getTips()", "collectTips()"], false)],
        )
    }

    #[test]
    fn resolves_initial_bindings() {
        let reg = sample();
        assert_eq!(reg.resolve(&"info()".into(), false).unwrap(), &Address::from("0xmgmt"));
        assert_eq!(reg.resolve(&"getTips()".into(), false).unwrap(), &Address::from("0xtips"));
        assert_eq!(reg.resolve(&"nope()".into(), false), Err(HostError::NotRegistered));
    }

    #[test]
    fn forked_resolution_excludes_unforwarded() {
        let reg = sample();
        assert!(reg.resolve(&"info()".into(), true).is_ok());
        assert_eq!(reg.resolve(&"getTips()".into(), true), Err(HostError::NotSupportedOnFork));
        assert_eq!(reg.resolve(&"nope()".into(), true), Err(HostError::NotRegistered));
    }

    #[test]
    fn add_requires_owner_and_overrides_route() {
        let mut reg = sample();
        assert_eq!(
            reg.add_entry(&Address::from("0xmallory"), Address::from("0xnew"), &ops(&["info()"]), true),
            Err(HostError::NotContractOwner)
        );
        reg.add_entry(&owner(), Address::from("0xnew"), &ops(&["info()"]), true)
            .expect("add");
        assert_eq!(reg.resolve(&"info()".into(), false).unwrap(), &Address::from("0xnew"));
        // the old binding became empty and was pruned
        assert_eq!(reg.module_addresses(), vec![Address::from("0xtips"), Address::from("0xnew")]);
    }

    #[test]
    fn remove_ignores_unknown_ids() {
        let mut reg = sample();
        reg.remove_entry(&owner(), &ops(&["getTips()", "unknown()"])).expect("remove");
        assert_eq!(reg.resolve(&"getTips()".into(), false), Err(HostError::NotRegistered));
        assert!(reg.resolve(&"collectTips()".into(), false).is_ok());
        assert_eq!(reg.operations_of(&Address::from("0xtips")), ops(&["collectTips()"]));
    }

    #[test]
    fn index_addressed_mutation_checks_bounds() {
        let mut reg = sample();
        assert_eq!(
            reg.replace_entry(&owner(), cut("0xx", &["a()"], false), 2),
            Err(HostError::IndexOutOfBounds)
        );
        assert_eq!(reg.remove_entry_at(&owner(), 5), Err(HostError::IndexOutOfBounds));
        assert_eq!(reg.remove_entry_at(&Address::from("0xm"), 0), Err(HostError::NotContractOwner));
    }

    #[test]
    fn replace_entry_unroutes_dropped_operations() {
        let mut reg = sample();
        reg.replace_entry(&owner(), cut("0xtips2", &["getTips()"], false), 1)
            .expect("replace");
        assert_eq!(reg.resolve(&"getTips()".into(), false).unwrap(), &Address::from("0xtips2"));
        assert_eq!(reg.resolve(&"collectTips()".into(), false), Err(HostError::NotRegistered));
        assert_eq!(reg.entries()[1].module, Address::from("0xtips2"));
    }

    #[test]
    fn replace_entry_taking_every_earlier_operation_prunes_that_cut() {
        let mut reg = sample();
        reg.replace_entry(&owner(), cut("0xall", &["info()", "getTips()"], true), 1)
            .expect("replace");
        assert_eq!(reg.entries().len(), 1);
        assert_eq!(reg.entries()[0].module, Address::from("0xall"));
        assert_eq!(reg.entries()[0].operations, ops(&["info()", "getTips()"]));
        assert_eq!(reg.resolve(&"info()".into(), true).unwrap(), &Address::from("0xall"));
        assert_eq!(reg.resolve(&"collectTips()".into(), false), Err(HostError::NotRegistered));
    }

    #[test]
    fn remove_entry_at_swaps_last_into_slot() {
        let mut reg = sample();
        reg.add_entry(&owner(), Address::from("0xbranch"), &ops(&["push()"]), true)
            .expect("add");
        let removed = reg.remove_entry_at(&owner(), 0).expect("remove");
        assert_eq!(removed.module, Address::from("0xmgmt"));
        assert_eq!(reg.entries()[0].module, Address::from("0xbranch"));
        assert_eq!(reg.entries()[1].module, Address::from("0xtips"));
        assert_eq!(reg.resolve(&"info()".into(), false), Err(HostError::NotRegistered));
    }
}
