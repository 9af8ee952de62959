//! Royalty policy: single payee, basis-point rate, floor-division split.
//!
//! External marketplaces read the policy; only the controlling principal
//! writes it, and the rate is capped well below the full basis-point range.

use tessera_common::{Address, Balance, BasisPoints, RegistryError, error::Result};

/// Highest configurable royalty rate, in basis points (10%).
pub const ROYALTY_BPS_CEILING: u16 = 1_000;

#[derive(Debug)]
pub(crate) struct RoyaltyPolicy {
    payee: Address,
    bps: BasisPoints,
}

impl RoyaltyPolicy {
    /// Policy at construction: the controller collects at `default_bps`.
    pub(crate) fn new(payee: Address, default_bps: u16) -> Self {
        debug_assert!(default_bps <= ROYALTY_BPS_CEILING);
        Self {
            payee,
            // The ceiling is far below BasisPoints::MAX, so this cannot fail.
            bps: BasisPoints::new(default_bps.min(ROYALTY_BPS_CEILING))
                .unwrap_or_default(),
        }
    }

    /// Overwrite payee and rate. `caller` must be the controller.
    pub(crate) fn configure(
        &mut self,
        caller: Address,
        controller: Address,
        payee: Address,
        bps: u16,
    ) -> Result<()> {
        if caller != controller {
            return Err(RegistryError::NotController);
        }
        if bps > ROYALTY_BPS_CEILING {
            return Err(RegistryError::RoyaltyBpsTooHigh(bps));
        }
        self.payee = payee;
        self.bps = BasisPoints::new(bps).unwrap_or_default();
        Ok(())
    }

    /// `(payee, floor(sale_price * bps / 10_000))`. Pure, never fails.
    pub(crate) fn royalty_info(&self, sale_price: Balance) -> (Address, Balance) {
        (self.payee, self.bps.share_of(sale_price))
    }

    pub(crate) fn payee(&self) -> Address {
        self.payee
    }

    pub(crate) fn bps(&self) -> u16 {
        self.bps.as_u16()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::new([tag; 32])
    }

    #[test]
    fn configure_is_controller_only() {
        let controller = addr(1);
        let mut policy = RoyaltyPolicy::new(controller, 500);

        assert_eq!(
            policy.configure(addr(2), controller, addr(3), 250),
            Err(RegistryError::NotController)
        );
        policy.configure(controller, controller, addr(3), 250).unwrap();
        assert_eq!(policy.payee(), addr(3));
        assert_eq!(policy.bps(), 250);
    }

    #[test]
    fn rate_ceiling_enforced() {
        let controller = addr(1);
        let mut policy = RoyaltyPolicy::new(controller, 500);
        assert_eq!(
            policy.configure(controller, controller, addr(1), 1_001),
            Err(RegistryError::RoyaltyBpsTooHigh(1_001))
        );
        assert!(policy.configure(controller, controller, addr(1), 1_000).is_ok());
    }

    #[test]
    fn royalty_amount_floors() {
        let policy = RoyaltyPolicy::new(addr(1), 500);
        assert_eq!(policy.royalty_info(100_000), (addr(1), 5_000));
        assert_eq!(policy.royalty_info(3), (addr(1), 0));
    }
}
