//! Transfer authorization and the ownership move itself.
//!
//! Authorization is recomputed from the ledger and the delegation table on
//! every call; there is no cached capability. Losing ownership therefore
//! revokes owner-derived authority immediately, while an explicit spender or
//! operator grant survives until revoked or consumed.

use tessera_common::{Address, ArtifactId, RegistryError, error::Result};

use crate::delegation::DelegationTable;
use crate::ledger::OwnershipLedger;

/// Validate a transfer without touching state. Check order is fixed:
/// unknown artifact, wrong claimed owner, zero recipient, then authority.
pub(crate) fn authorize(
    ledger: &OwnershipLedger,
    delegation: &DelegationTable,
    caller: Address,
    from: Address,
    to: Address,
    id: ArtifactId,
) -> Result<()> {
    let holder = ledger.owner_of(id)?;
    if holder != from {
        return Err(RegistryError::TransferFromWrongOwner {
            id,
            claimed: from,
            actual: holder,
        });
    }
    if to.is_zero() {
        return Err(RegistryError::TransferToZero);
    }
    let authorized = caller == from
        || delegation.approved_for(ledger, id)? == Some(caller)
        || delegation.is_approved_for_all(from, caller);
    if !authorized {
        return Err(RegistryError::CallerNotOwnerNorApproved(id));
    }
    Ok(())
}

/// Authorize and perform the move: clear the stale single spender, re-home
/// the artifact. All checks run before the first write.
pub(crate) fn execute_transfer(
    ledger: &mut OwnershipLedger,
    delegation: &mut DelegationTable,
    caller: Address,
    from: Address,
    to: Address,
    id: ArtifactId,
) -> Result<()> {
    authorize(ledger, delegation, caller, from, to, id)?;
    delegation.clear(id);
    ledger.set_owner(id, to);
    Ok(())
}

/// Creation path used only by the mint gate: no prior holder exists, so only
/// the zero-recipient check applies before the first write.
pub(crate) fn execute_issue(
    ledger: &mut OwnershipLedger,
    to: Address,
    id: ArtifactId,
) -> Result<()> {
    if to.is_zero() {
        return Err(RegistryError::MintToZero);
    }
    ledger.set_owner(id, to);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::new([tag; 32])
    }

    fn setup(holder: Address) -> (OwnershipLedger, DelegationTable, ArtifactId) {
        let mut ledger = OwnershipLedger::new();
        let id = ArtifactId(1);
        ledger.set_owner(id, holder);
        (ledger, DelegationTable::new(), id)
    }

    #[test]
    fn check_order_unknown_before_wrong_owner() {
        let ledger = OwnershipLedger::new();
        let table = DelegationTable::new();
        assert_eq!(
            authorize(&ledger, &table, addr(1), addr(1), addr(2), ArtifactId(7)),
            Err(RegistryError::InvalidToken(ArtifactId(7)))
        );
    }

    #[test]
    fn wrong_claimed_owner_is_named() {
        let (ledger, table, id) = setup(addr(1));
        assert_eq!(
            authorize(&ledger, &table, addr(2), addr(2), addr(3), id),
            Err(RegistryError::TransferFromWrongOwner {
                id,
                claimed: addr(2),
                actual: addr(1),
            })
        );
    }

    #[test]
    fn zero_recipient_checked_before_authority() {
        let (ledger, table, id) = setup(addr(1));
        // Caller is not authorized either, but the zero recipient wins.
        assert_eq!(
            authorize(&ledger, &table, addr(2), addr(1), Address::ZERO, id),
            Err(RegistryError::TransferToZero)
        );
    }

    #[test]
    fn owner_spender_and_operator_are_each_sufficient() {
        let (alice, bob, carol) = (addr(1), addr(2), addr(3));
        let (mut ledger, mut table, id) = setup(alice);

        assert!(authorize(&ledger, &table, alice, alice, carol, id).is_ok());

        table.approve(&ledger, alice, id, bob).unwrap();
        assert!(authorize(&ledger, &table, bob, alice, carol, id).is_ok());

        table.clear(id);
        assert_eq!(
            authorize(&ledger, &table, bob, alice, carol, id),
            Err(RegistryError::CallerNotOwnerNorApproved(id))
        );

        table.set_approval_for_all(alice, bob, true).unwrap();
        assert!(authorize(&ledger, &table, bob, alice, carol, id).is_ok());

        execute_transfer(&mut ledger, &mut table, bob, alice, carol, id).unwrap();
        assert_eq!(ledger.owner_of(id).unwrap(), carol);
    }

    #[test]
    fn transfer_consumes_single_spender() {
        let (alice, bob, carol) = (addr(1), addr(2), addr(3));
        let (mut ledger, mut table, id) = setup(alice);

        table.approve(&ledger, alice, id, bob).unwrap();
        execute_transfer(&mut ledger, &mut table, bob, alice, carol, id).unwrap();

        assert_eq!(table.approved_for(&ledger, id).unwrap(), None);
        // Consumed: bob cannot move it again out of carol's hands.
        assert_eq!(
            authorize(&ledger, &table, bob, carol, alice, id),
            Err(RegistryError::CallerNotOwnerNorApproved(id))
        );
    }

    #[test]
    fn issue_rejects_zero_recipient() {
        let mut ledger = OwnershipLedger::new();
        assert_eq!(
            execute_issue(&mut ledger, Address::ZERO, ArtifactId(1)),
            Err(RegistryError::MintToZero)
        );
        assert!(!ledger.contains(ArtifactId(1)));
    }
}
