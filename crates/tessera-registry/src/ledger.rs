//! Identity ledger: who holds which artifact.
//!
//! Exclusively owns the id→owner and owner→count maps. Other components read
//! through the accessors here; only the transfer path mutates, and it must
//! validate eligibility *before* calling [`OwnershipLedger::set_owner`].

use std::collections::HashMap;

use tessera_common::{Address, ArtifactId, RegistryError, error::Result};

#[derive(Debug, Default)]
pub(crate) struct OwnershipLedger {
    owners: HashMap<ArtifactId, Address>,
    balances: HashMap<Address, u64>,
}

impl OwnershipLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current holder of `id`.
    pub(crate) fn owner_of(&self, id: ArtifactId) -> Result<Address> {
        self.owners
            .get(&id)
            .copied()
            .ok_or(RegistryError::InvalidToken(id))
    }

    /// Whether `id` has ever been issued.
    pub(crate) fn contains(&self, id: ArtifactId) -> bool {
        self.owners.contains_key(&id)
    }

    /// Number of artifacts currently held by `holder`.
    pub(crate) fn balance_of(&self, holder: Address) -> Result<u64> {
        if holder.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        Ok(self.balances.get(&holder).copied().unwrap_or(0))
    }

    /// Re-home `id` to `new_owner`, maintaining both holders' counts.
    ///
    /// No validation happens here: callers check eligibility first. On first
    /// issuance there is no previous holder and only the recipient's count
    /// moves.
    pub(crate) fn set_owner(&mut self, id: ArtifactId, new_owner: Address) {
        if let Some(previous) = self.owners.insert(id, new_owner) {
            match self.balances.get_mut(&previous) {
                Some(count) if *count > 1 => *count -= 1,
                _ => {
                    self.balances.remove(&previous);
                }
            }
        }
        *self.balances.entry(new_owner).or_insert(0) += 1;
    }

}
