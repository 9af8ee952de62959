//! Registry failure taxonomy.
//!
//! Every mutating operation fails all-or-nothing with exactly one of these
//! named conditions; no partial state change survives an error and no retry
//! happens internally. The gateway maps variants onto HTTP statuses via
//! [`RegistryError::kind`].

use thiserror::Error;

use crate::types::{Address, ArtifactId, Balance, Tick};

/// Result alias pre-filled with [`RegistryError`].
pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // ---------------------------------------------------------------------
    // Access control
    // ---------------------------------------------------------------------
    #[error("caller is not the registry controller")]
    NotController,

    #[error("caller is neither owner nor approved for {0}")]
    CallerNotOwnerNorApproved(ArtifactId),

    // ---------------------------------------------------------------------
    // Admission control
    // ---------------------------------------------------------------------
    #[error("supply cap reached, no further artifacts can be issued")]
    SupplyCapExceeded,

    #[error("payment too low: required {required}, offered {offered}")]
    PaymentTooLow { required: Balance, offered: Balance },

    #[error("mint cooldown active for {remaining} more ticks")]
    CooldownActive { remaining: Tick },

    // ---------------------------------------------------------------------
    // Input validation
    // ---------------------------------------------------------------------
    #[error("cannot mint to the zero address")]
    MintToZero,

    #[error("cannot transfer to the zero address")]
    TransferToZero,

    #[error("cannot grant operator approval to the caller itself")]
    ApproveToCaller,

    #[error("unknown artifact {0}")]
    InvalidToken(ArtifactId),

    #[error("layer count {given} exceeds the per-artifact maximum of {max}")]
    LayerIndexOutOfRange { given: u8, max: u8 },

    #[error("royalty of {0} basis points exceeds the policy ceiling")]
    RoyaltyBpsTooHigh(u16),

    #[error("the zero address holds no balance")]
    ZeroAddress,

    // ---------------------------------------------------------------------
    // Ownership consistency
    // ---------------------------------------------------------------------
    #[error("transfer from wrong owner: {id} is held by {actual}, not {claimed}")]
    TransferFromWrongOwner {
        id: ArtifactId,
        claimed: Address,
        actual: Address,
    },

    // ---------------------------------------------------------------------
    // Safe-transfer surface
    // ---------------------------------------------------------------------
    #[error("recipient refused the artifact")]
    ReceiverRejected,

    // ---------------------------------------------------------------------
    // Concurrency
    // ---------------------------------------------------------------------
    #[error("reentrant call while another registry mutation is in flight")]
    Reentrancy,
}

impl RegistryError {
    /// Stable machine-readable discriminant, used by the gateway's error
    /// envelope and by log correlation.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::NotController => "not_controller",
            RegistryError::CallerNotOwnerNorApproved(_) => "caller_not_owner_nor_approved",
            RegistryError::SupplyCapExceeded => "supply_cap_exceeded",
            RegistryError::PaymentTooLow { .. } => "payment_too_low",
            RegistryError::CooldownActive { .. } => "cooldown_active",
            RegistryError::MintToZero => "mint_to_zero",
            RegistryError::TransferToZero => "transfer_to_zero",
            RegistryError::ApproveToCaller => "approve_to_caller",
            RegistryError::InvalidToken(_) => "invalid_token",
            RegistryError::LayerIndexOutOfRange { .. } => "layer_index_out_of_range",
            RegistryError::RoyaltyBpsTooHigh(_) => "royalty_bps_too_high",
            RegistryError::ZeroAddress => "zero_address",
            RegistryError::TransferFromWrongOwner { .. } => "transfer_from_wrong_owner",
            RegistryError::ReceiverRejected => "receiver_rejected",
            RegistryError::Reentrancy => "reentrancy",
        }
    }
}
