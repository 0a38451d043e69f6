//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::connect::chains::ChainDefinition;

/// Root configuration for the wallet hub.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HubConfig {
    /// Application name shown to wallets that display a requester identity.
    pub app_name: String,

    /// Deployment-specific project identifier handed to configured wallet
    /// factories.
    pub project_id: String,

    /// Discovery behavior.
    pub discovery: DiscoveryConfig,

    /// Chains the hub may register with a wallet during a switch.
    pub chains: Vec<ChainDefinition>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Discovery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// How long to collect announcements before the initial set is returned.
    pub settle_window_ms: u64,

    /// Whether to inspect the legacy injected slot at all.
    pub legacy_scan: bool,

    /// Whether connection resolution may fall back to the static registry.
    pub registry_fallback: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            settle_window_ms: 150,
            legacy_scan: true,
            registry_fallback: true,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter (e.g., "info", "wallet_hub=debug").
    pub log_level: String,

    /// Emit logs as JSON instead of human-readable lines.
    pub log_json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}
