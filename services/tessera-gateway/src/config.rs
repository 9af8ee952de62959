//! Layered gateway configuration.
//!
//! Priority (lowest → highest):
//! 1. Compile-time defaults (`impl Default`).
//! 2. An optional TOML file passed at start-up.
//! 3. Environment variables with `TESSERA` prefix, double underscore as the
//!    path separator:
//!
//!     TESSERA__COLLECTION__NAME="Tessera Genesis"
//!     TESSERA__MINT__PRICE=50000000000000000

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use tessera_common::{Address, types::TypeError};
use tessera_registry::{MintRules, RegistryConfig};

/// Collection identity as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "Tessera".into(),
            symbol: "TSRA".into(),
            base_uri: "ipfs://tessera/".into(),
        }
    }
}

/// Top-level configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Socket the HTTP listener binds.
    pub bind_addr: String,
    /// Controlling principal, hex-encoded. Royalty/base-URI writes and the
    /// initial royalty payee all resolve to this address.
    pub controller: String,
    pub collection: CollectionConfig,
    pub mint: MintRules,
    /// Royalty rate installed at construction, in basis points.
    pub default_royalty_bps: u16,
    /// Capacity of the fact broadcast channel.
    pub event_buffer: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            controller: Address::new([0x11; 32]).to_string(),
            collection: CollectionConfig::default(),
            mint: MintRules::default(),
            default_royalty_bps: 500,
            event_buffer: 256,
        }
    }
}

impl GatewayConfig {
    /// Build the layered configuration. `config_path` is an optional explicit
    /// TOML file; environment variables override it either way.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&GatewayConfig::default())?);

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        } else {
            builder = builder.add_source(File::with_name("gateway").required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("TESSERA")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Parsed controller address.
    pub fn controller_address(&self) -> Result<Address, TypeError> {
        self.controller.parse()
    }

    /// The registry-core view of this configuration.
    pub fn registry_config(&self) -> Result<RegistryConfig, TypeError> {
        let mut registry = RegistryConfig::new(
            self.collection.name.clone(),
            self.collection.symbol.clone(),
            self.collection.base_uri.clone(),
            self.controller_address()?,
        );
        registry.mint = self.mint.clone();
        registry.default_royalty_bps = self.default_royalty_bps;
        Ok(registry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_form_a_valid_registry_config() {
        let cfg = GatewayConfig::default();
        let registry = cfg.registry_config().unwrap();
        assert_eq!(registry.name, "Tessera");
        assert_eq!(registry.mint.supply_cap, 10_000);
        assert_eq!(registry.mint.max_layers, 32);
        assert_eq!(registry.mint.cooldown_ticks, 18);
    }

    #[test]
    fn malformed_controller_is_surfaced() {
        let cfg = GatewayConfig {
            controller: "0x1234".into(),
            ..GatewayConfig::default()
        };
        assert!(cfg.controller_address().is_err());
    }
}
