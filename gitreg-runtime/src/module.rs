//! The module seam.
//!
//! A module is stateless code keyed by address. Every call it serves runs
//! against an [`Invocation`]: the host state, the scope the call arrived in
//! (a tenant or the factory) and the explicit caller context.

use gitreg_core::{Address, Amount, HostConfig, HostError, OperationId, Tick};

use crate::call::{Call, CallContext, Reply};
use crate::state::HostState;
use crate::tenant::TenantStorage;

/// Where an invocation is executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Factory,
    Tenant(Address),
}

pub trait Module: Send + Sync {
    /// Human-readable module name, also used by deployment manifests.
    fn name(&self) -> &'static str;

    /// Operation identifiers this module serves.
    fn operations(&self) -> Vec<OperationId>;

    /// Execute `call`. Any error discards every change made by the
    /// invocation, including ledger movements.
    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError>;
}

pub struct Invocation<'a> {
    pub state: &'a mut HostState,
    pub scope: Scope,
    pub ctx: &'a CallContext,
    pub tick: Tick,
    pub config: &'a HostConfig,
}

impl<'a> Invocation<'a> {
    pub fn caller(&self) -> &Address {
        &self.ctx.caller
    }

    pub fn value(&self) -> Amount {
        self.ctx.value
    }

    /// Location of the tenant this call runs in; `WrongScope` at factory scope.
    pub fn location(&self) -> Result<&Address, HostError> {
        match &self.scope {
            Scope::Tenant(location) => Ok(location),
            Scope::Factory => Err(HostError::WrongScope),
        }
    }

    pub fn tenant(&self) -> Result<&TenantStorage, HostError> {
        self.state.tenant(self.location()?)
    }

    pub fn tenant_mut(&mut self) -> Result<&mut TenantStorage, HostError> {
        let location = self.location()?.clone();
        self.state.tenant_mut(&location)
    }

    /// Fails with `WrongScope` unless this call runs at factory scope.
    pub fn require_factory(&self) -> Result<(), HostError> {
        match self.scope {
            Scope::Factory => Ok(()),
            Scope::Tenant(_) => Err(HostError::WrongScope),
        }
    }
}
