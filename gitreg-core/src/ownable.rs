//! Single-owner access control shared by the factory and both registries.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::types::Address;

/// Owner gate. A renounced owner is the null address, after which every
/// owner-only call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn only_owner(&self, caller: &Address) -> Result<(), HostError> {
        if self.owner.is_zero() || &self.owner != caller {
            return Err(HostError::NotContractOwner);
        }
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), HostError> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(HostError::ZeroOwner);
        }
        tracing::info!(from = %self.owner, to = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    pub fn renounce_ownership(&mut self, caller: &Address) -> Result<(), HostError> {
        self.only_owner(caller)?;
        tracing::info!(from = %self.owner, "ownership renounced");
        self.owner = Address::zero();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::from("0xa11ce")
    }
    fn bob() -> Address {
        Address::from("0xb0b")
    }

    #[test]
    fn non_owner_is_rejected() {
        let gate = Ownable::new(alice());
        assert_eq!(gate.only_owner(&bob()), Err(HostError::NotContractOwner));
        assert!(gate.only_owner(&alice()).is_ok());
    }

    #[test]
    fn transfer_rejects_zero_and_non_owner() {
        let mut gate = Ownable::new(alice());
        assert_eq!(
            gate.transfer_ownership(&alice(), Address::zero()),
            Err(HostError::ZeroOwner)
        );
        assert_eq!(
            gate.transfer_ownership(&bob(), bob()),
            Err(HostError::NotContractOwner)
        );
        gate.transfer_ownership(&alice(), bob()).expect("transfer");
        assert_eq!(gate.owner(), &bob());
        assert!(gate.only_owner(&alice()).is_err());
    }

    #[test]
    fn renounced_gate_rejects_everyone() {
        let mut gate = Ownable::new(alice());
        gate.renounce_ownership(&alice()).expect("renounce");
        assert!(gate.owner().is_zero());
        assert_eq!(gate.only_owner(&alice()), Err(HostError::NotContractOwner));
        assert_eq!(gate.only_owner(&Address::zero()), Err(HostError::NotContractOwner));
    }
}
