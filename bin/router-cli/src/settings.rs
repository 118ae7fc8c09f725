use anyhow::{Context, Result};
use router_core::{RegistryConfig, RoutingConfig};
use serde::Deserialize;
use std::collections::HashMap;

/// RPC endpoint profile
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NetworkConfig {
    pub url: String,

    /// Expected chain id; queried from the node when absent
    pub chain_id: Option<u64>,

    /// Legacy gas price in wei
    pub gas_price: Option<u64>,

    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Name of the profile in `networks` to use
    #[serde(default = "default_network")]
    pub network: String,

    pub registry: RegistryConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,

    /// Hex-encoded signer key, required only for swaps
    pub private_key: Option<String>,
}

fn default_network() -> String {
    "localhost".to_string()
}

impl AppConfig {
    /// Loads `path` (TOML) and overlays `ROUTER_*` environment variables
    ///
    /// Nested keys use `__`, e.g. `ROUTER_ROUTING__QUOTE_TIMEOUT_MS=500`.
    pub fn load(path: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("ROUTER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to read configuration from {path}"))?;

        cfg.try_deserialize().context("invalid router configuration")
    }

    /// Active network profile
    pub fn network(&self, name: Option<&str>) -> Result<(&str, &NetworkConfig)> {
        let name = name.unwrap_or(&self.network);
        let (name, network) = self
            .networks
            .get_key_value(name)
            .with_context(|| format!("unknown network profile: {name}"))?;
        Ok((name.as_str(), network))
    }
}
