//! Installed module code, keyed by module address.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use gitreg_core::{Address, OperationId};

use crate::error::RuntimeError;
use crate::module::Module;
use crate::modules::{
    BranchModule, IssueModule, ManagementModule, RepositoryManagementModule, TipModule,
};

/// Well-known address of a module installed under `name`.
pub fn module_address(name: &str) -> Address {
    Address::derive(&format!("module:{name}"), 0)
}

/// One module as published for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleAbi {
    pub name: String,
    pub address: Address,
    pub operations: Vec<OperationId>,
}

#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: BTreeMap<Address, Arc<dyn Module>>,
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.modules.iter().map(|(a, m)| (a, m.name())))
            .finish()
    }
}

impl ModuleCatalog {
    /// Every builtin module at its well-known address.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.install_named(Arc::new(ManagementModule));
        catalog.install_named(Arc::new(BranchModule));
        catalog.install_named(Arc::new(IssueModule));
        catalog.install_named(Arc::new(TipModule));
        catalog.install_named(Arc::new(RepositoryManagementModule));
        catalog
    }

    /// Install `module` at `address`, replacing whatever was there.
    pub fn install(&mut self, address: Address, module: Arc<dyn Module>) {
        tracing::debug!(module = module.name(), address = %address, "module installed");
        self.modules.insert(address, module);
    }

    /// Install `module` at the well-known address for its name, returning it.
    pub fn install_named(&mut self, module: Arc<dyn Module>) -> Address {
        let address = module_address(module.name());
        self.install(address.clone(), module);
        address
    }

    pub fn get(&self, address: &Address) -> Option<&Arc<dyn Module>> {
        self.modules.get(address)
    }

    /// Look a module up by address or by name.
    pub fn find(&self, name_or_address: &str) -> Option<(&Address, &Arc<dyn Module>)> {
        self.modules
            .get_key_value(&Address::from(name_or_address))
            .or_else(|| self.modules.iter().find(|(_, m)| m.name() == name_or_address))
    }

    pub fn abi(&self) -> Vec<ModuleAbi> {
        self.modules
            .iter()
            .map(|(address, module)| ModuleAbi {
                name: module.name().to_string(),
                address: address.clone(),
                operations: module.operations(),
            })
            .collect()
    }

    pub fn abi_json(&self) -> Result<String, RuntimeError> {
        Ok(serde_json::to_string_pretty(&self.abi())?)
    }
}
