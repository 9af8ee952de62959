//! The registry aggregate: one owner of all mutable collection state.
//!
//! Global counters and maps live as fields here rather than as
//! free-standing globals, so ownership and testability stay explicit. The
//! aggregate is `Send + Sync`: reads take the state lock directly, while
//! every mutating entry point first acquires a single-flight permit. The
//! permit is a degenerate single-permit lock: a reentrant mutating call
//! (the safe-transfer receiver callback calling back in, for one) fails
//! with `Reentrancy` instead of deadlocking or observing half-applied
//! state. The permit is released by RAII on every exit path.
//!
//! Mutations are all-or-nothing: each entry point runs its full check
//! sequence before the first field is written, and facts go out through the
//! [`EventSink`] only after the mutation has fully applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::{info, instrument};

use tessera_common::{
    Address, ArtifactId, Balance, EventSink, RegistryError, RegistryEvent, Tick, TraitRoot,
    error::Result,
};

use crate::artifact::{ArtifactRecord, ArtifactVault};
use crate::clock::ChainClock;
use crate::delegation::DelegationTable;
use crate::gate::{MintGate, MintRules};
use crate::ledger::OwnershipLedger;
use crate::receiver::ArtifactReceiver;
use crate::royalty::RoyaltyPolicy;
use crate::transfer;

// ----------------------------------------------------------------------------
// Capability identifiers
// ----------------------------------------------------------------------------

/// Ownership/transfer surface.
pub const CAP_OWNERSHIP: [u8; 4] = [0x80, 0xac, 0x58, 0xcd];
/// Name/symbol/URI metadata surface.
pub const CAP_METADATA: [u8; 4] = [0x5b, 0x5e, 0x13, 0x9f];
/// Royalty-info surface queried by marketplaces.
pub const CAP_ROYALTY_INFO: [u8; 4] = [0x2a, 0x55, 0x20, 0x5a];

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Collection identity and issuance rules, fixed at construction (the base
/// URI is the one field the controller may later swap).
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    /// The single controlling principal. Never rotated.
    pub controller: Address,
    pub mint: MintRules,
    /// Royalty rate installed at construction, payable to the controller.
    pub default_royalty_bps: u16,
}

impl RegistryConfig {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        base_uri: impl Into<String>,
        controller: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            base_uri: base_uri.into(),
            controller,
            mint: MintRules::default(),
            default_royalty_bps: 500,
        }
    }
}

// ----------------------------------------------------------------------------
// The aggregate
// ----------------------------------------------------------------------------

struct RegistryState {
    ledger: OwnershipLedger,
    delegation: DelegationTable,
    vault: ArtifactVault,
    gate: MintGate,
    royalty: RoyaltyPolicy,
    base_uri: String,
}

pub struct Registry {
    config: RegistryConfig,
    state: RwLock<RegistryState>,
    in_flight: AtomicBool,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn ChainClock>,
}

/// RAII single-flight permit; release happens in `Drop` so failure paths
/// can never leave the registry locked.
struct EntryPermit<'a> {
    flag: &'a AtomicBool,
}

impl Drop for EntryPermit<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl Registry {
    pub fn new(
        config: RegistryConfig,
        clock: Arc<dyn ChainClock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let state = RegistryState {
            ledger: OwnershipLedger::new(),
            delegation: DelegationTable::new(),
            vault: ArtifactVault::new(),
            gate: MintGate::new(),
            royalty: RoyaltyPolicy::new(config.controller, config.default_royalty_bps),
            base_uri: config.base_uri.clone(),
        };
        Self {
            config,
            state: RwLock::new(state),
            in_flight: AtomicBool::new(false),
            events,
            clock,
        }
    }

    fn enter(&self) -> Result<EntryPermit<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| RegistryError::Reentrancy)?;
        Ok(EntryPermit {
            flag: &self.in_flight,
        })
    }

    // ------------------------------------------------------------------
    // Mutating surface
    // ------------------------------------------------------------------

    /// Issue the next artifact to `to` against `payment`.
    ///
    /// Admission runs in a fixed order (first failure wins): reentrancy,
    /// zero recipient, supply cap, payment floor, layer bound, per-caller
    /// cooldown. Payment above the floor is accepted and retained.
    #[instrument(skip_all, fields(caller = %caller, to = %to))]
    pub fn mint(
        &self,
        caller: Address,
        payment: Balance,
        to: Address,
        trait_root: TraitRoot,
        layer_count: u8,
    ) -> Result<ArtifactId> {
        let _permit = self.enter()?;
        let now = self.clock.now();

        let mut guard = self.state.write();
        let state = &mut *guard;
        state
            .gate
            .admit(&self.config.mint, caller, to, payment, layer_count, now)?;

        let id = state.gate.next_id();
        transfer::execute_issue(&mut state.ledger, to, id)?;
        state.vault.insert(
            id,
            ArtifactRecord {
                trait_root,
                layer_count,
                issued_at: now,
            },
        );
        let issued = state.gate.commit_mint(caller, now);
        debug_assert_eq!(issued, id);
        drop(guard);

        self.events.emit(RegistryEvent::Transfer {
            from: None,
            to,
            id,
        });
        self.events.emit(RegistryEvent::ArtifactIssued {
            recipient: to,
            id,
            trait_root,
            layer_count,
            payment,
        });
        info!(%id, recipient = %to, payment, "artifact issued");
        Ok(id)
    }

    /// Move `id` from `from` to `to`. The caller must be the holder, the
    /// single spender for `id`, or a blanket operator of the holder,
    /// re-derived fresh on every call. The single spender is consumed.
    #[instrument(skip_all, fields(caller = %caller, id = %id))]
    pub fn transfer(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: ArtifactId,
    ) -> Result<()> {
        let _permit = self.enter()?;

        let mut guard = self.state.write();
        let state = &mut *guard;
        transfer::execute_transfer(&mut state.ledger, &mut state.delegation, caller, from, to, id)?;
        drop(guard);

        self.events.emit(RegistryEvent::Transfer {
            from: Some(from),
            to,
            id,
        });
        Ok(())
    }

    /// Like [`Registry::transfer`], but consults `receiver` for acceptance
    /// first. The callback runs under the single-flight permit with no state
    /// lock held: a reentrant mutating call fails with `Reentrancy`, and a
    /// refusal fails the whole transfer with no state change.
    #[instrument(skip_all, fields(caller = %caller, id = %id))]
    pub fn transfer_safe(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        id: ArtifactId,
        receiver: &dyn ArtifactReceiver,
    ) -> Result<()> {
        let _permit = self.enter()?;

        {
            let guard = self.state.read();
            transfer::authorize(&guard.ledger, &guard.delegation, caller, from, to, id)?;
        }

        if !receiver.on_artifact_received(caller, from, id) {
            return Err(RegistryError::ReceiverRejected);
        }

        let mut guard = self.state.write();
        let state = &mut *guard;
        transfer::execute_transfer(&mut state.ledger, &mut state.delegation, caller, from, to, id)?;
        drop(guard);

        self.events.emit(RegistryEvent::Transfer {
            from: Some(from),
            to,
            id,
        });
        Ok(())
    }

    /// Set (or clear, with the zero address) the single spender for `id`.
    #[instrument(skip_all, fields(caller = %caller, id = %id))]
    pub fn approve(&self, caller: Address, id: ArtifactId, spender: Address) -> Result<()> {
        let _permit = self.enter()?;

        let mut guard = self.state.write();
        let state = &mut *guard;
        let holder = state.delegation.approve(&state.ledger, caller, id, spender)?;
        drop(guard);

        self.events.emit(RegistryEvent::Approval {
            holder,
            spender: (!spender.is_zero()).then_some(spender),
            id,
        });
        Ok(())
    }

    /// Toggle a blanket operator grant. Idempotent; the fact is emitted even
    /// when nothing changed.
    #[instrument(skip_all, fields(caller = %caller, operator = %operator, approved))]
    pub fn set_approval_for_all(
        &self,
        caller: Address,
        operator: Address,
        approved: bool,
    ) -> Result<()> {
        let _permit = self.enter()?;

        self.state
            .write()
            .delegation
            .set_approval_for_all(caller, operator, approved)?;

        self.events.emit(RegistryEvent::OperatorApproval {
            holder: caller,
            operator,
            approved,
        });
        Ok(())
    }

    /// Overwrite the royalty payee and rate. Controller only.
    #[instrument(skip_all, fields(caller = %caller, bps))]
    pub fn configure_royalty(&self, caller: Address, payee: Address, bps: u16) -> Result<()> {
        let _permit = self.enter()?;

        self.state
            .write()
            .royalty
            .configure(caller, self.config.controller, payee, bps)?;

        self.events
            .emit(RegistryEvent::RoyaltyConfigured { payee, bps });
        info!(payee = %payee, bps, "royalty policy configured");
        Ok(())
    }

    /// Swap the metadata base URI. Controller only; the fact carries both
    /// the previous and the new value.
    #[instrument(skip_all, fields(caller = %caller))]
    pub fn set_base_uri(&self, caller: Address, new_uri: impl Into<String>) -> Result<()> {
        let _permit = self.enter()?;
        if caller != self.config.controller {
            return Err(RegistryError::NotController);
        }

        let new_uri = new_uri.into();
        let previous = {
            let mut guard = self.state.write();
            std::mem::replace(&mut guard.base_uri, new_uri.clone())
        };

        self.events.emit(RegistryEvent::BaseUriChanged {
            previous,
            new: new_uri,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn base_uri(&self) -> String {
        self.state.read().base_uri.clone()
    }

    pub fn total_minted(&self) -> u64 {
        self.state.read().gate.total_minted()
    }

    /// Supply still mintable, floored at 0.
    pub fn remaining_supply(&self) -> u64 {
        self.state.read().gate.remaining(self.config.mint.supply_cap)
    }

    /// The id the next successful mint will receive.
    pub fn next_id(&self) -> ArtifactId {
        self.state.read().gate.next_id()
    }

    pub fn owner_of(&self, id: ArtifactId) -> Result<Address> {
        self.state.read().ledger.owner_of(id)
    }

    pub fn balance_of(&self, holder: Address) -> Result<u64> {
        self.state.read().ledger.balance_of(holder)
    }

    pub fn approved_for(&self, id: ArtifactId) -> Result<Option<Address>> {
        let guard = self.state.read();
        guard.delegation.approved_for(&guard.ledger, id)
    }

    pub fn is_approved_for_all(&self, holder: Address, operator: Address) -> bool {
        self.state.read().delegation.is_approved_for_all(holder, operator)
    }

    /// Immutable issuance record for `id`.
    pub fn artifact(&self, id: ArtifactId) -> Result<ArtifactRecord> {
        self.state.read().vault.record_of(id)
    }

    /// Base URI + decimal id. Resolution of the URI itself is the metadata
    /// host's concern, not the registry's.
    pub fn artifact_uri(&self, id: ArtifactId) -> Result<String> {
        let guard = self.state.read();
        guard.vault.record_of(id)?;
        Ok(format!("{}{}", guard.base_uri, id.0))
    }

    /// Ticks until `caller` may mint again; 0 when free to mint.
    pub fn cooldown_remaining(&self, caller: Address) -> Tick {
        self.state.read().gate.cooldown_remaining(
            caller,
            self.config.mint.cooldown_ticks,
            self.clock.now(),
        )
    }

    pub fn royalty_rate(&self) -> (Address, u16) {
        let guard = self.state.read();
        (guard.royalty.payee(), guard.royalty.bps())
    }

    /// `(payee, floor(sale_price * bps / 10_000))`.
    pub fn royalty_info(&self, sale_price: Balance) -> (Address, Balance) {
        self.state.read().royalty.royalty_info(sale_price)
    }

    pub fn mint_price(&self) -> Balance {
        self.config.mint.price
    }

    pub fn supply_cap(&self) -> u64 {
        self.config.mint.supply_cap
    }

    pub fn controller(&self) -> Address {
        self.config.controller
    }

    /// Capability discovery for external integrators.
    pub fn supports_capability(&self, capability: [u8; 4]) -> bool {
        matches!(capability, CAP_OWNERSHIP | CAP_METADATA | CAP_ROYALTY_INFO)
    }
}
