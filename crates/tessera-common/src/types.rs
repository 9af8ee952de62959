//! Primitive new-types shared across the Tessera workspace.
//!
//! Addresses and trait roots are fixed-size byte arrays that display and
//! serialize as lowercase, `0x`-prefixed hex so they read the same in logs,
//! JSON payloads and test assertions.

// ----------------------------------------------------------------------------
// Std & external imports
// ----------------------------------------------------------------------------
use std::{fmt, str::FromStr};

use hex::{FromHex, ToHex};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

// ----------------------------------------------------------------------------
// Aliases
// ----------------------------------------------------------------------------

/// Payment amount in smallest denomination (18-decimal base units).
pub type Balance = u128;

/// Monotonic ledger time. Production wires wall-clock seconds; tests drive it
/// by hand. The mint cooldown is measured in ticks.
pub type Tick = u64;

// ----------------------------------------------------------------------------
// Error handling
// ----------------------------------------------------------------------------

/// Parse/validation failures for the primitives in this module.
///
/// Registry operations have their own taxonomy in [`crate::error`]; this enum
/// only covers malformed textual input and out-of-range constructor values.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("malformed {what}: expected {expected} hex chars, got {got}")]
    Length {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    #[error("basis points out of range: {0} (max {max})", max = BasisPoints::MAX)]
    BasisPointsOutOfRange(u16),
}

// ----------------------------------------------------------------------------
// Address
// ----------------------------------------------------------------------------

/// A 32-byte principal address.
///
/// The all-zero address is the null identity: it is never a valid owner,
/// recipient or spender, and doubles as the "clear approval" sentinel.
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    pub const LEN: usize = 32;

    /// The null identity.
    pub const ZERO: Address = Address([0u8; 32]);

    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0.encode_hex::<String>())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, TypeError> {
        let raw = s.strip_prefix("0x").unwrap_or(s).to_ascii_lowercase();
        if raw.len() != Self::LEN * 2 {
            return Err(TypeError::Length {
                what: "address",
                expected: Self::LEN * 2,
                got: raw.len(),
            });
        }
        Ok(Self(<[u8; Self::LEN]>::from_hex(raw)?))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ----------------------------------------------------------------------------
// ArtifactId
// ----------------------------------------------------------------------------

/// Sequential artifact identifier, allocated from 1 and never reused.
#[derive(
    Copy, Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ArtifactId(pub u64);

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ArtifactId {
    fn from(v: u64) -> Self {
        ArtifactId(v)
    }
}

impl From<ArtifactId> for u64 {
    fn from(v: ArtifactId) -> Self {
        v.0
    }
}

// ----------------------------------------------------------------------------
// TraitRoot
// ----------------------------------------------------------------------------

/// Opaque 256-bit commitment to an artifact's generative trait data.
///
/// The registry stores the root verbatim at issuance and never verifies it
/// against proofs; [`TraitRoot::commit`] is a convenience for callers that
/// hold the raw trait bytes.
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TraitRoot([u8; 32]);

impl TraitRoot {
    pub const LEN: usize = 32;

    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Blake3 commitment over raw trait bytes.
    pub fn commit(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TraitRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.0.encode_hex::<String>())
    }
}

impl fmt::Debug for TraitRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for TraitRoot {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, TypeError> {
        let raw = s.strip_prefix("0x").unwrap_or(s).to_ascii_lowercase();
        if raw.len() != Self::LEN * 2 {
            return Err(TypeError::Length {
                what: "trait root",
                expected: Self::LEN * 2,
                got: raw.len(),
            });
        }
        Ok(Self(<[u8; Self::LEN]>::from_hex(raw)?))
    }
}

impl Serialize for TraitRoot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TraitRoot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ----------------------------------------------------------------------------
// BasisPoints
// ----------------------------------------------------------------------------

/// Percentage in basis points (1/100th of a percent), range `0..=10_000`.
///
/// Policy ceilings below the full range (the royalty cap, for one) are
/// enforced where the policy lives, not here.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// One hundred percent.
    pub const MAX: u16 = 10_000;

    /// Divisor for share arithmetic.
    pub const DENOMINATOR: u128 = 10_000;

    pub fn new(bp: u16) -> Result<Self, TypeError> {
        if bp > Self::MAX {
            Err(TypeError::BasisPointsOutOfRange(bp))
        } else {
            Ok(Self(bp))
        }
    }

    #[inline]
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// Floor share of `amount` at this rate.
    pub fn share_of(self, amount: Balance) -> Balance {
        // Split so the intermediate product stays inside u128.
        let rate = u128::from(self.0);
        (amount / Self::DENOMINATOR) * rate + (amount % Self::DENOMINATOR) * rate / Self::DENOMINATOR
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_round_trip() {
        let addr = Address::new([0xab; 32]);
        let text = addr.to_string();
        assert!(text.starts_with("0xabab"));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_rejects_short_input() {
        assert!(matches!(
            "0xdeadbeef".parse::<Address>(),
            Err(TypeError::Length { .. })
        ));
    }

    #[test]
    fn address_json_is_hex_string() {
        let addr = Address::new([1; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);
    }

    #[test]
    fn zero_address_is_null_identity() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([7; 32]).is_zero());
    }

    #[test]
    fn trait_root_commit_is_deterministic() {
        let a = TraitRoot::commit(b"layers: 12, palette: dusk");
        let b = TraitRoot::commit(b"layers: 12, palette: dusk");
        assert_eq!(a, b);
        assert_ne!(a, TraitRoot::commit(b"layers: 12, palette: dawn"));
    }

    #[test]
    fn basis_points_bounds() {
        assert!(BasisPoints::new(10_000).is_ok());
        assert!(BasisPoints::new(10_001).is_err());
    }

    #[test]
    fn share_of_rounds_down() {
        let bp = BasisPoints::new(500).unwrap();
        assert_eq!(bp.share_of(100_000), 5_000);
        assert_eq!(bp.share_of(3), 0);
        assert_eq!(bp.share_of(199), 9);
    }

    #[test]
    fn share_of_survives_large_amounts() {
        let bp = BasisPoints::new(10_000).unwrap();
        assert_eq!(bp.share_of(Balance::MAX), Balance::MAX);
    }
}
