//! Mint admission control and id allocation.
//!
//! The gate owns the issuance counters and the per-caller cooldown stamps.
//! Admission checks are pure and run in a fixed order (first failure wins);
//! the counters move only in [`MintGate::commit_mint`], after every check
//! and the ownership write have succeeded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tessera_common::{Address, ArtifactId, Balance, RegistryError, Tick, error::Result};

/// Issuance economics and bounds, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintRules {
    /// Payment floor per mint. Excess payment is accepted and retained.
    pub price: Balance,
    /// Hard cap on artifacts ever issued.
    pub supply_cap: u64,
    /// Upper bound on an artifact's layer count.
    pub max_layers: u8,
    /// Minimum ticks between successful mints by the same caller.
    pub cooldown_ticks: Tick,
}

impl Default for MintRules {
    fn default() -> Self {
        Self {
            price: 50_000_000_000_000_000,
            supply_cap: 10_000,
            max_layers: 32,
            cooldown_ticks: 18,
        }
    }
}

#[derive(Debug)]
pub(crate) struct MintGate {
    next_id: u64,
    total_minted: u64,
    last_mint: HashMap<Address, Tick>,
}

impl MintGate {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            total_minted: 0,
            last_mint: HashMap::new(),
        }
    }

    /// Run the admission checks in order: zero recipient, supply cap,
    /// payment floor, layer bound, cooldown. Pure; no counter moves.
    pub(crate) fn admit(
        &self,
        rules: &MintRules,
        caller: Address,
        to: Address,
        payment: Balance,
        layer_count: u8,
        now: Tick,
    ) -> Result<()> {
        if to.is_zero() {
            return Err(RegistryError::MintToZero);
        }
        if self.total_minted >= rules.supply_cap {
            return Err(RegistryError::SupplyCapExceeded);
        }
        if payment < rules.price {
            return Err(RegistryError::PaymentTooLow {
                required: rules.price,
                offered: payment,
            });
        }
        if layer_count > rules.max_layers {
            return Err(RegistryError::LayerIndexOutOfRange {
                given: layer_count,
                max: rules.max_layers,
            });
        }
        let remaining = self.cooldown_remaining(caller, rules.cooldown_ticks, now);
        if remaining > 0 {
            return Err(RegistryError::CooldownActive { remaining });
        }
        Ok(())
    }

    /// The id the next successful mint will receive.
    pub(crate) fn next_id(&self) -> ArtifactId {
        ArtifactId(self.next_id)
    }

    /// Advance the counters and stamp the caller's cooldown. Only called
    /// after admission and the ownership write have both succeeded.
    pub(crate) fn commit_mint(&mut self, caller: Address, now: Tick) -> ArtifactId {
        let id = ArtifactId(self.next_id);
        self.next_id += 1;
        self.total_minted += 1;
        self.last_mint.insert(caller, now);
        id
    }

    pub(crate) fn total_minted(&self) -> u64 {
        self.total_minted
    }

    /// Supply still mintable under `cap`, floored at 0.
    pub(crate) fn remaining(&self, cap: u64) -> u64 {
        cap.saturating_sub(self.total_minted)
    }

    /// Ticks until `caller` may mint again; 0 when never minted or expired.
    pub(crate) fn cooldown_remaining(
        &self,
        caller: Address,
        cooldown_ticks: Tick,
        now: Tick,
    ) -> Tick {
        match self.last_mint.get(&caller) {
            Some(last) => last.saturating_add(cooldown_ticks).saturating_sub(now),
            None => 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::new([tag; 32])
    }

    fn rules() -> MintRules {
        MintRules {
            price: 100,
            supply_cap: 2,
            max_layers: 32,
            cooldown_ticks: 18,
        }
    }

    #[test]
    fn admission_order_first_failure_wins() {
        let gate = MintGate::new();
        let r = rules();

        // Zero recipient outranks the too-low payment.
        assert_eq!(
            gate.admit(&r, addr(1), Address::ZERO, 0, 99, 0),
            Err(RegistryError::MintToZero)
        );
        // Payment floor outranks the layer bound.
        assert_eq!(
            gate.admit(&r, addr(1), addr(2), 99, 99, 0),
            Err(RegistryError::PaymentTooLow {
                required: 100,
                offered: 99,
            })
        );
        assert_eq!(
            gate.admit(&r, addr(1), addr(2), 100, 33, 0),
            Err(RegistryError::LayerIndexOutOfRange { given: 33, max: 32 })
        );
        assert!(gate.admit(&r, addr(1), addr(2), 100, 32, 0).is_ok());
    }

    #[test]
    fn supply_cap_blocks_further_mints() {
        let mut gate = MintGate::new();
        let r = rules();

        gate.commit_mint(addr(1), 0);
        gate.commit_mint(addr(2), 0);
        assert_eq!(gate.total_minted(), 2);
        assert_eq!(gate.remaining(r.supply_cap), 0);
        assert_eq!(
            gate.admit(&r, addr(3), addr(3), 100, 1, 50),
            Err(RegistryError::SupplyCapExceeded)
        );
    }

    #[test]
    fn cooldown_window_edges() {
        let mut gate = MintGate::new();
        let r = rules();
        let caller = addr(1);

        gate.commit_mint(caller, 100);
        assert_eq!(
            gate.admit(&r, caller, addr(2), 100, 1, 117),
            Err(RegistryError::CooldownActive { remaining: 1 })
        );
        assert!(gate.admit(&r, caller, addr(2), 100, 1, 118).is_ok());
        // A different caller is unaffected.
        assert!(gate.admit(&r, addr(9), addr(2), 100, 1, 100).is_ok());
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut gate = MintGate::new();
        assert_eq!(gate.next_id(), ArtifactId(1));
        assert_eq!(gate.commit_mint(addr(1), 0), ArtifactId(1));
        assert_eq!(gate.commit_mint(addr(2), 0), ArtifactId(2));
        assert_eq!(gate.next_id(), ArtifactId(3));
    }
}
