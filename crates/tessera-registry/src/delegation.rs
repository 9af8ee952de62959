//! Delegation table: who may move an artifact besides its holder.
//!
//! Two delegation shapes exist side by side. A *single spender* is approved
//! for one artifact and is consumed by the next transfer of that artifact.
//! A *blanket operator* is approved by a holder for all of that holder's
//! artifacts and survives transfers until explicitly revoked.

use std::collections::{HashMap, HashSet};

use tessera_common::{Address, ArtifactId, RegistryError, error::Result};

use crate::ledger::OwnershipLedger;

#[derive(Debug, Default)]
pub(crate) struct DelegationTable {
    spenders: HashMap<ArtifactId, Address>,
    operators: HashSet<(Address, Address)>,
}

impl DelegationTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record (or clear, when `spender` is the zero address) the single
    /// spender for `id`.
    ///
    /// The caller must be the artifact's holder or a blanket operator of the
    /// holder. The holder is returned so the aggregate can stamp it on the
    /// approval fact.
    pub(crate) fn approve(
        &mut self,
        ledger: &OwnershipLedger,
        caller: Address,
        id: ArtifactId,
        spender: Address,
    ) -> Result<Address> {
        let holder = ledger.owner_of(id)?;
        if caller != holder && !self.is_approved_for_all(holder, caller) {
            return Err(RegistryError::CallerNotOwnerNorApproved(id));
        }
        if spender.is_zero() {
            self.spenders.remove(&id);
        } else {
            self.spenders.insert(id, spender);
        }
        Ok(holder)
    }

    /// Toggle blanket operator approval for every artifact `caller` holds now
    /// or later. Idempotent; re-asserting an existing grant is not an error.
    pub(crate) fn set_approval_for_all(
        &mut self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        if operator == caller {
            return Err(RegistryError::ApproveToCaller);
        }
        if approved {
            self.operators.insert((caller, operator));
        } else {
            self.operators.remove(&(caller, operator));
        }
        Ok(())
    }

    /// The single spender for `id`, if any.
    pub(crate) fn approved_for(
        &self,
        ledger: &OwnershipLedger,
        id: ArtifactId,
    ) -> Result<Option<Address>> {
        if !ledger.contains(id) {
            return Err(RegistryError::InvalidToken(id));
        }
        Ok(self.spenders.get(&id).copied())
    }

    /// Whether `operator` holds a blanket grant from `holder`. Pure lookup.
    pub(crate) fn is_approved_for_all(&self, holder: Address, operator: Address) -> bool {
        self.operators.contains(&(holder, operator))
    }

    /// Drop the stale single spender after a transfer. Operator grants are
    /// untouched.
    pub(crate) fn clear(&mut self, id: ArtifactId) {
        self.spenders.remove(&id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::new([tag; 32])
    }

    fn ledger_with(id: ArtifactId, holder: Address) -> OwnershipLedger {
        let mut ledger = OwnershipLedger::new();
        ledger.set_owner(id, holder);
        ledger
    }

    #[test]
    fn approve_requires_holder_or_operator() {
        let (alice, bob, carol) = (addr(1), addr(2), addr(3));
        let id = ArtifactId(1);
        let ledger = ledger_with(id, alice);
        let mut table = DelegationTable::new();

        assert_eq!(
            table.approve(&ledger, bob, id, carol),
            Err(RegistryError::CallerNotOwnerNorApproved(id))
        );

        table.approve(&ledger, alice, id, carol).unwrap();
        assert_eq!(table.approved_for(&ledger, id).unwrap(), Some(carol));

        // An operator of the holder may re-delegate.
        table.set_approval_for_all(alice, bob, true).unwrap();
        table.approve(&ledger, bob, id, bob).unwrap();
        assert_eq!(table.approved_for(&ledger, id).unwrap(), Some(bob));
    }

    #[test]
    fn zero_spender_clears() {
        let alice = addr(1);
        let id = ArtifactId(1);
        let ledger = ledger_with(id, alice);
        let mut table = DelegationTable::new();

        table.approve(&ledger, alice, id, addr(9)).unwrap();
        table.approve(&ledger, alice, id, Address::ZERO).unwrap();
        assert_eq!(table.approved_for(&ledger, id).unwrap(), None);
    }

    #[test]
    fn operator_grant_is_idempotent() {
        let (alice, bob) = (addr(1), addr(2));
        let mut table = DelegationTable::new();

        table.set_approval_for_all(alice, bob, true).unwrap();
        table.set_approval_for_all(alice, bob, true).unwrap();
        assert!(table.is_approved_for_all(alice, bob));

        table.set_approval_for_all(alice, bob, false).unwrap();
        assert!(!table.is_approved_for_all(alice, bob));
    }

    #[test]
    fn self_approval_is_rejected() {
        let alice = addr(1);
        let mut table = DelegationTable::new();
        assert_eq!(
            table.set_approval_for_all(alice, alice, true),
            Err(RegistryError::ApproveToCaller)
        );
    }

    #[test]
    fn approved_for_unknown_artifact_fails() {
        let table = DelegationTable::new();
        let ledger = OwnershipLedger::new();
        assert_eq!(
            table.approved_for(&ledger, ArtifactId(4)),
            Err(RegistryError::InvalidToken(ArtifactId(4)))
        );
    }
}
