//! Canonical, cross-crate types for the Tessera artifact registry.
//!
//! This crate is **dependency-light** and **stable**, making it safe to be
//! imported by the registry core, the gateway and any future tooling. It
//! holds three things:
//!
//! 1. Primitive new-types ([`Address`], [`ArtifactId`], [`TraitRoot`],
//!    [`BasisPoints`]) and aliases ([`Balance`], [`Tick`]).
//! 2. The registry failure taxonomy ([`RegistryError`]).
//! 3. The observable facts ([`RegistryEvent`]) and the [`EventSink`] port
//!    through which they leave the registry.

pub mod error;
pub mod events;
pub mod types;

pub use error::RegistryError;
pub use events::{EventSink, NullSink, RegistryEvent};
pub use types::{Address, ArtifactId, Balance, BasisPoints, Tick, TraitRoot, TypeError};
