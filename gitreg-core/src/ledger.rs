//! Native value balances per account.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::types::{Address, Amount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Ledger {
    #[serde(default)]
    balances: BTreeMap<Address, Amount>,
}

impl Ledger {
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit `account` out of thin air. Used to fund accounts in tests and
    /// from the operator CLI.
    pub fn deposit(&mut self, account: &Address, amount: Amount) {
        let balance = self.balances.entry(account.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Move `amount` from `from` to `to`. Fails without touching either
    /// balance when `from` cannot cover it.
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), HostError> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(HostError::InsufficientBalance);
        }
        self.balances.insert(from.clone(), available - amount);
        self.deposit(to, amount);
        Ok(())
    }
}
