//! Top-level assembly.
//!
//! Builds the discovery engine, orchestrator and context from a validated
//! [`HubConfig`] plus the externally supplied provider surfaces, and exposes
//! the deduplicated wallet view consumers present to users.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::HubConfig;
use crate::connect::context::WalletContext;
use crate::connect::orchestrator::ConnectionOrchestrator;
use crate::discovery::dedup::{self, DeduplicationResult};
use crate::discovery::engine::DiscoveryEngine;
use crate::provider::announce::AnnouncementBus;
use crate::provider::injected::InjectedProviders;
use crate::wallet::icons;
use crate::wallet::types::{
    materialize_groups, DetectedWallet, ExtendedWallet, WalletBuildConfig, WalletGroup,
};

/// The assembled wallet subsystem.
pub struct WalletHub {
    config: HubConfig,
    engine: Arc<DiscoveryEngine>,
    context: WalletContext,
    configured: BTreeMap<String, Vec<ExtendedWallet>>,
}

impl WalletHub {
    /// Assemble from config and the host-supplied discovery surfaces.
    pub fn new(
        config: HubConfig,
        bus: Arc<AnnouncementBus>,
        injected: InjectedProviders,
    ) -> Self {
        let injected = if config.discovery.legacy_scan {
            injected
        } else {
            tracing::info!("Legacy injection scan disabled by config");
            InjectedProviders::none()
        };

        let engine = DiscoveryEngine::with_settle_window(
            bus,
            injected,
            Duration::from_millis(config.discovery.settle_window_ms),
        );
        let orchestrator = ConnectionOrchestrator::new(engine.clone())
            .with_registry_fallback(config.discovery.registry_fallback);
        let mut context = WalletContext::new(orchestrator);
        context.set_known_chains(config.chains.clone());

        Self {
            config,
            engine,
            context,
            configured: BTreeMap::new(),
        }
    }

    /// Materialize configured wallet groups with this deployment's branding
    /// and make them resolvable for connection. Invoked once per group list;
    /// icons are resolved eagerly so pickers never render placeholders.
    pub async fn configure_wallets(&mut self, groups: &[WalletGroup]) {
        let build_config = WalletBuildConfig {
            project_id: self.config.project_id.clone(),
            app_name: self.config.app_name.clone(),
        };
        let materialized = materialize_groups(groups, &build_config);
        for wallets in materialized.values() {
            icons::resolve_all(wallets).await;
        }
        self.context
            .orchestrator()
            .set_configured(materialized.clone());
        self.configured = materialized;
    }

    /// Run discovery and return the initial detected set.
    pub async fn initialize(&self) -> Arc<Vec<DetectedWallet>> {
        self.engine.initialize().await
    }

    /// The current deduplicated view: surviving detections plus configured
    /// groups with live duplicates filtered out. Re-derivable at any time.
    pub fn wallet_view(&self) -> DeduplicationResult {
        dedup::deduplicate(&self.engine.wallets(), &self.configured)
    }

    /// The deduplicated view as one group map, detections under
    /// `installed_group_name`.
    pub fn grouped_wallets(
        &self,
        installed_group_name: &str,
    ) -> BTreeMap<String, Vec<ExtendedWallet>> {
        self.wallet_view().unified_groups(installed_group_name)
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<DiscoveryEngine> {
        &self.engine
    }

    pub fn context(&self) -> &WalletContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::StubProvider;
    use crate::provider::transport::BrandFlags;
    use crate::wallet::types::{IconSource, WalletBuilder};
    use serde_json::json;

    const ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn fast_config() -> HubConfig {
        let mut config = HubConfig::default();
        config.app_name = "Demo".to_string();
        config.project_id = "pid-1".to_string();
        config.discovery.settle_window_ms = 5;
        config
    }

    fn metamask_slot() -> InjectedProviders {
        InjectedProviders::with_primary(Arc::new(
            StubProvider::with_flags(BrandFlags {
                is_metamask: true,
                ..Default::default()
            })
            .stub("eth_requestAccounts", json!([ADDR]))
            .stub("eth_chainId", json!("0x1")),
        ))
    }

    fn configured_group(group: &str, wallets: Vec<(&'static str, &'static str)>) -> WalletGroup {
        WalletGroup {
            group_name: group.to_string(),
            builders: wallets
                .into_iter()
                .map(|(id, name)| {
                    Arc::new(move |_: &WalletBuildConfig| {
                        ExtendedWallet::new(id, name, IconSource::Url(format!("data:,{id}")))
                    }) as WalletBuilder
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_view_and_connect() {
        let mut hub = WalletHub::new(fast_config(), AnnouncementBus::new(), metamask_slot());
        hub.configure_wallets(&[configured_group(
            "Popular",
            vec![("metamask", "MetaMask"), ("okx", "OKX Wallet")],
        )])
        .await;
        hub.initialize().await;

        // The configured MetaMask entry is shadowed by the live detection.
        let grouped = hub.grouped_wallets("Installed");
        assert_eq!(grouped["Installed"].len(), 1);
        assert_eq!(grouped["Popular"].len(), 1);
        assert_eq!(grouped["Popular"][0].id, "okx");
        // Icons were resolved eagerly at configuration time.
        assert!(grouped["Popular"][0].icon_loaded());

        let result = hub.context().connect("io.metamask").await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_legacy_scan_toggle() {
        let mut config = fast_config();
        config.discovery.legacy_scan = false;

        let hub = WalletHub::new(config, AnnouncementBus::new(), metamask_slot());
        assert!(hub.initialize().await.is_empty());
    }

    #[tokio::test]
    async fn test_registry_fallback_toggle() {
        let mut config = fast_config();
        config.discovery.registry_fallback = false;

        let hub = WalletHub::new(config, AnnouncementBus::new(), metamask_slot());
        hub.initialize().await;

        // The alias would resolve with the fallback enabled.
        let result = hub.context().connect("metamask").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("metamask"));

        // Direct ids still work.
        let result = hub.context().connect("io.metamask").await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_configured_chains_reach_the_context() {
        let mut config = fast_config();
        config.chains = vec![crate::connect::chains::ChainDefinition {
            id: 56,
            name: "BNB Chain".to_string(),
            native_currency: crate::connect::chains::NativeCurrency {
                name: "BNB".to_string(),
                symbol: "BNB".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://bsc-dataseed.binance.org".to_string()],
            block_explorer_url: None,
        }];

        let hub = WalletHub::new(config, AnnouncementBus::new(), metamask_slot());
        assert_eq!(hub.config().chains.len(), 1);
    }
}
