//! Operation resolution.
//!
//! A tenant call resolves against the tenant's own overrides first, then
//! against the shared repository registry using the tenant's fork flag. A
//! factory call resolves against the factory registry only. The resolved
//! address must have code in the catalog.

use std::sync::Arc;

use gitreg_core::{Address, HostError, OperationId};

use crate::catalog::ModuleCatalog;
use crate::module::{Module, Scope};
use crate::state::HostState;

/// Module address handling `operation` in `scope`.
pub fn resolve(state: &HostState, scope: &Scope, operation: &OperationId) -> Result<Address, HostError> {
    match scope {
        Scope::Factory => state.factory_registry.resolve(operation, false).cloned(),
        Scope::Tenant(location) => {
            let tenant = state.tenant(location)?;
            if let Some(module) = tenant.overrides.get(operation) {
                return Ok(module.clone());
            }
            state.repository_registry.resolve(operation, tenant.forked).cloned()
        }
    }
}

/// Code for `operation` in `scope`.
pub fn resolve_module(
    state: &HostState,
    catalog: &ModuleCatalog,
    scope: &Scope,
    operation: &OperationId,
) -> Result<Arc<dyn Module>, HostError> {
    let address = resolve(state, scope, operation)?;
    let module = catalog.get(&address).cloned().ok_or(HostError::NotRegistered)?;
    tracing::debug!(operation = %operation, module = module.name(), address = %address, "operation resolved");
    Ok(module)
}
