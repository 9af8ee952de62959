//! Ownership-and-transfer core of the Tessera artifact registry.
//!
//! The registry issues unique numbered artifacts against payment, binds each
//! one permanently to a generative-art trait commitment at issuance, and
//! tracks ownership, delegation and royalty policy over the collection's
//! lifetime.
//!
//! Everything hangs off one owning aggregate, [`Registry`]:
//!
//! - [`ledger`]: artifact id to holder, and per-holder counts
//! - [`delegation`]: single-spender and blanket operator approvals
//! - [`transfer`]: authorization rules and the ownership move itself
//! - [`gate`]: mint admission control (supply cap, payment floor,
//!   per-caller cooldown) and id allocation
//! - [`artifact`]: immutable per-artifact records, written once at mint
//! - [`royalty`]: payee + basis-point rate consulted by marketplaces
//!
//! Mutating entry points serialize through a single-flight permit; a call
//! that re-enters the registry while another mutation is in flight fails
//! with [`RegistryError::Reentrancy`](tessera_common::RegistryError::Reentrancy)
//! instead of observing partially-updated state. Time is a port
//! ([`ChainClock`]) so the mint cooldown can be driven by hand in tests, and
//! the safe transfer form consults an [`ArtifactReceiver`] before moving
//! ownership.

pub mod artifact;
pub mod clock;
pub mod delegation;
pub mod gate;
pub mod ledger;
pub mod receiver;
pub mod registry;
pub mod royalty;
pub mod transfer;

pub use artifact::ArtifactRecord;
pub use clock::{ChainClock, ManualClock, SystemClock};
pub use gate::MintRules;
pub use receiver::{AcceptAll, ArtifactReceiver};
pub use registry::{
    CAP_METADATA, CAP_OWNERSHIP, CAP_ROYALTY_INFO, Registry, RegistryConfig,
};
pub use royalty::ROYALTY_BPS_CEILING;
