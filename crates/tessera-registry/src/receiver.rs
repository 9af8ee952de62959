//! Safe-transfer acceptance port.
//!
//! The "safe" transfer form asks the recipient's collaborator whether the
//! recipient can take custody of this asset type before any state moves.
//! The callback is externally controlled code and may try to call back into
//! the registry; it runs under the single-flight permit, so any such
//! reentrant mutation fails instead of observing partial state.

use tessera_common::{Address, ArtifactId};

/// Recipient-side acceptance check consulted by
/// [`Registry::transfer_safe`](crate::Registry::transfer_safe).
pub trait ArtifactReceiver {
    /// Return `true` to accept custody of `id`. `operator` is the caller
    /// that initiated the transfer; `from` the holder giving it up.
    fn on_artifact_received(&self, operator: Address, from: Address, id: ArtifactId) -> bool;
}

/// Receiver that accepts everything. The plain-transfer semantics, made
/// explicit for callers of the safe form.
pub struct AcceptAll;

impl ArtifactReceiver for AcceptAll {
    fn on_artifact_received(&self, _operator: Address, _from: Address, _id: ArtifactId) -> bool {
        true
    }
}
