//! Immutable per-artifact records, written exactly once at mint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tessera_common::{ArtifactId, RegistryError, Tick, TraitRoot, error::Result};

/// What an artifact *is*, fixed forever at issuance. Ownership lives in the
/// ledger; nothing here changes after the mint that wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Opaque commitment to the generative trait data.
    pub trait_root: TraitRoot,
    /// Number of composition layers, bounded by the mint rules.
    pub layer_count: u8,
    /// Ledger tick at which the artifact was issued.
    pub issued_at: Tick,
}

#[derive(Debug, Default)]
pub(crate) struct ArtifactVault {
    records: HashMap<ArtifactId, ArtifactRecord>,
}

impl ArtifactVault {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_of(&self, id: ArtifactId) -> Result<ArtifactRecord> {
        self.records
            .get(&id)
            .copied()
            .ok_or(RegistryError::InvalidToken(id))
    }

    /// Write the record for a freshly allocated id. Ids are never reused, so
    /// each id is written at most once.
    pub(crate) fn insert(&mut self, id: ArtifactId, record: ArtifactRecord) {
        self.records.insert(id, record);
    }
}
