//! HTTP facade for the Tessera artifact registry.
//!
//! The gateway is intentionally thin: cheap syntactic validation of inbound
//! JSON, a span per request, then a direct call into the in-process
//! [`Registry`](tessera_registry::Registry). Facts emitted by the registry
//! are bridged onto a `tokio::sync::broadcast` channel for indexers and
//! websocket fan-out to subscribe to.

pub mod config;
pub mod events;
pub mod rest_api;

pub use config::GatewayConfig;
pub use events::BroadcastSink;
pub use rest_api::{AppState, router};
