//! Observable facts and the sink they leave through.
//!
//! One fact is emitted per successful state transition, never on failure.
//! External indexers treat the fact stream as the durable audit trail, so
//! the registry emits each fact exactly once, after the mutation has fully
//! applied.

use serde::{Deserialize, Serialize};

use crate::types::{Address, ArtifactId, Balance, TraitRoot};

/// The registry's audit-trail facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Ownership moved. `from` is `None` on first issuance.
    Transfer {
        from: Option<Address>,
        to: Address,
        id: ArtifactId,
    },

    /// Single-spender approval set or cleared (`spender: None`).
    Approval {
        holder: Address,
        spender: Option<Address>,
        id: ArtifactId,
    },

    /// Blanket operator approval toggled. Emitted even when the flag did not
    /// change; the call is idempotent but the fact is not suppressed.
    OperatorApproval {
        holder: Address,
        operator: Address,
        approved: bool,
    },

    /// A new artifact was issued against payment.
    ArtifactIssued {
        recipient: Address,
        id: ArtifactId,
        trait_root: TraitRoot,
        layer_count: u8,
        payment: Balance,
    },

    /// Royalty payee/rate overwritten by the controller.
    RoyaltyConfigured { payee: Address, bps: u16 },

    /// Metadata base URI swapped by the controller.
    BaseUriChanged { previous: String, new: String },
}

/// Port through which facts leave the registry.
///
/// Implementations must not call back into the registry; they run while a
/// mutation holds the single-flight permit.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RegistryEvent);
}

/// Sink that swallows every fact. Useful for tools that only need the
/// registry's return values.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RegistryEvent) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn facts_serialize_with_tag() {
        let fact = RegistryEvent::Transfer {
            from: None,
            to: Address::new([3; 32]),
            id: ArtifactId(1),
        };
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["type"], "transfer");
        assert!(json["from"].is_null());
        assert_eq!(json["id"], 1);
    }
}
