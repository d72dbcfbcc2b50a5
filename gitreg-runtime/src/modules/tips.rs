//! Tip accumulators at tenant and factory scope.
//!
//! Tips arrive through plain value transfers (see `Host::transfer`) and
//! through the factory share of settled bounties. Collecting pays out the
//! whole accumulator to the owner of the scope.

use gitreg_core::{HostError, OperationId};

use crate::call::{ops, Call, Reply};
use crate::module::{Invocation, Module, Scope};

#[derive(Debug, Default, Clone, Copy)]
pub struct TipModule;

impl Module for TipModule {
    fn name(&self) -> &'static str {
        "GitTips"
    }

    fn operations(&self) -> Vec<OperationId> {
        vec![ops::GET_TIPS.into(), ops::COLLECT_TIPS.into()]
    }

    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError> {
        let collect = match call {
            Call::GetTips => false,
            Call::CollectTips => true,
            _ => return Err(HostError::NotRegistered),
        };
        let caller = inv.caller().clone();

        match inv.scope.clone() {
            Scope::Factory => {
                inv.state.factory.ownership().only_owner(&caller)?;
                if !collect {
                    return Ok(Reply::Amount(inv.state.factory.tips()));
                }
                let amount = inv.state.factory.take_tips();
                let factory = inv.state.factory.address.clone();
                inv.state.ledger.transfer(&factory, &caller, amount)?;
                tracing::info!(owner = %caller, amount, "factory tips collected");
                Ok(Reply::Amount(amount))
            }
            Scope::Tenant(location) => {
                let tenant = inv.state.tenant_mut(&location)?;
                if tenant.forked {
                    return Err(HostError::NotSupportedOnFork);
                }
                if tenant.owner != caller {
                    return Err(HostError::NotAllowed);
                }
                if !collect {
                    return Ok(Reply::Amount(tenant.tips));
                }
                let amount = std::mem::take(&mut tenant.tips);
                inv.state.ledger.transfer(&location, &caller, amount)?;
                tracing::info!(repo = %location, owner = %caller, amount, "tips collected");
                Ok(Reply::Amount(amount))
            }
        }
    }
}
