//! The host: state, installed module code, tick source and configuration.
//!
//! Every public operation either commits completely or leaves the state
//! exactly as it found it. [`Host::invoke`] and [`Host::invoke_factory`]
//! snapshot [`HostState`] before running a call and restore the snapshot on
//! any error, which also undoes ledger movements made during the call.

use std::sync::Arc;

use gitreg_core::{
    Address, Amount, CapabilityRegistry, HostConfig, HostError, TickSource, Tick,
};

use crate::call::{Call, CallContext, Reply};
use crate::catalog::ModuleCatalog;
use crate::dispatch;
use crate::error::RuntimeError;
use crate::factory::FactoryState;
use crate::manifest::DeploymentManifest;
use crate::module::{Invocation, Scope};
use crate::state::HostState;
use crate::tenant::OverrideCut;

pub struct Host {
    state: HostState,
    catalog: ModuleCatalog,
    clock: Arc<dyn TickSource>,
    config: HostConfig,
}

impl Host {
    /// Deploy a fresh host with the builtin module catalog.
    pub fn deploy(
        owner: Address,
        manifest: &DeploymentManifest,
        config: HostConfig,
        clock: Arc<dyn TickSource>,
    ) -> Result<Self, RuntimeError> {
        Self::deploy_with(owner, manifest, ModuleCatalog::builtin(), config, clock)
    }

    /// Deploy a fresh host whose registries are built from `manifest`
    /// against `catalog`. `owner` owns both registries and the factory.
    pub fn deploy_with(
        owner: Address,
        manifest: &DeploymentManifest,
        catalog: ModuleCatalog,
        config: HostConfig,
        clock: Arc<dyn TickSource>,
    ) -> Result<Self, RuntimeError> {
        if owner.is_zero() {
            return Err(HostError::ZeroOwner.into());
        }
        config.validate()?;
        let repository_cuts = manifest.repository_cuts(&catalog)?;
        let factory_cuts = manifest.factory_cuts(&catalog)?;
        let state = HostState {
            repository_registry: CapabilityRegistry::new(owner.clone(), repository_cuts),
            factory_registry: CapabilityRegistry::new(owner.clone(), factory_cuts),
            factory: FactoryState::new(Address::derive("factory", 0), owner.clone()),
            tenants: Default::default(),
            ledger: Default::default(),
            nonce: 0,
        };
        tracing::info!(
            owner = %owner,
            factory = %state.factory.address,
            repository_modules = manifest.repository_modules.len(),
            factory_modules = manifest.factory_modules.len(),
            "host deployed"
        );
        Ok(Self { state, catalog, clock, config })
    }

    /// Rebuild a host around previously persisted state.
    pub fn from_state(
        state: HostState,
        catalog: ModuleCatalog,
        config: HostConfig,
        clock: Arc<dyn TickSource>,
    ) -> Self {
        Self { state, catalog, clock, config }
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ModuleCatalog {
        &mut self.catalog
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick()
    }

    pub fn factory_address(&self) -> &Address {
        &self.state.factory.address
    }

    /// The shared repository-scope registry. Mutations are owner-gated by
    /// the registry itself.
    pub fn repository_registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.state.repository_registry
    }

    pub fn factory_registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.state.factory_registry
    }

    // -----------------------------------------------------------------------
    // Invocation
    // -----------------------------------------------------------------------

    /// Invoke `call` on the tenant at `location`.
    pub fn invoke(
        &mut self,
        ctx: &CallContext,
        location: &Address,
        call: Call,
    ) -> Result<Reply, HostError> {
        self.execute(ctx, Scope::Tenant(location.clone()), call)
    }

    /// Invoke `call` on the factory.
    pub fn invoke_factory(&mut self, ctx: &CallContext, call: Call) -> Result<Reply, HostError> {
        self.execute(ctx, Scope::Factory, call)
    }

    fn execute(&mut self, ctx: &CallContext, scope: Scope, call: Call) -> Result<Reply, HostError> {
        let operation = call.operation_id();
        let snapshot = self.state.clone();
        match self.run(ctx, scope, call) {
            Ok(reply) => Ok(reply),
            Err(err) => {
                self.state = snapshot;
                tracing::warn!(
                    operation = %operation,
                    caller = %ctx.caller,
                    error = %err,
                    "invocation rolled back"
                );
                Err(err)
            }
        }
    }

    fn run(&mut self, ctx: &CallContext, scope: Scope, call: Call) -> Result<Reply, HostError> {
        let operation = call.operation_id();
        let module = dispatch::resolve_module(&self.state, &self.catalog, &scope, &operation)?;

        if ctx.value > 0 {
            if !call.is_payable() {
                return Err(HostError::NotPayable);
            }
            let target = match &scope {
                Scope::Factory => self.state.factory.address.clone(),
                Scope::Tenant(location) => location.clone(),
            };
            self.state.ledger.transfer(&ctx.caller, &target, ctx.value)?;
        }

        let mut inv = Invocation {
            state: &mut self.state,
            scope,
            ctx,
            tick: self.clock.current_tick(),
            config: &self.config,
        };
        module.execute(&mut inv, call)
    }

    // -----------------------------------------------------------------------
    // Value
    // -----------------------------------------------------------------------

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.state.ledger.balance_of(account)
    }

    /// Credit `account` with freshly minted value.
    pub fn deposit(&mut self, account: &Address, amount: Amount) {
        self.state.ledger.deposit(account, amount);
        tracing::info!(account = %account, amount, "deposit");
    }

    /// Move value between accounts. Value sent to a tenant or to the factory
    /// lands in its tip accumulator. Forks cannot receive tips.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), HostError> {
        if self.state.tenants.get(to).is_some_and(|t| t.forked) {
            return Err(HostError::NotSupportedOnFork);
        }
        self.state.ledger.transfer(from, to, amount)?;
        if to == &self.state.factory.address {
            self.state.factory.add_tips(amount);
        } else if let Some(tenant) = self.state.tenants.get_mut(to) {
            tenant.tips = tenant.tips.saturating_add(amount);
        }
        tracing::info!(from = %from, to = %to, amount, "transfer");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Factory administration
    // -----------------------------------------------------------------------

    /// Apply per-tenant route overrides. Factory owner only.
    pub fn update_repository_modules(
        &mut self,
        caller: &Address,
        location: &Address,
        cuts: Vec<OverrideCut>,
    ) -> Result<(), HostError> {
        self.state.factory.ownership().only_owner(caller)?;
        let tenant = self.state.tenant_mut(location)?;
        let count = cuts.len();
        for cut in cuts {
            tenant.apply_override(cut);
        }
        tracing::info!(repo = %location, cuts = count, "repository modules updated");
        Ok(())
    }

    pub fn transfer_factory_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), HostError> {
        self.state.factory.ownership_mut().transfer_ownership(caller, new_owner)
    }

    pub fn renounce_factory_ownership(&mut self, caller: &Address) -> Result<(), HostError> {
        self.state.factory.ownership_mut().renounce_ownership(caller)
    }
}
