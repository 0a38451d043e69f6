//! Connection orchestration.
//!
//! # Data Flow
//! ```text
//! connect(wallet_id)
//!     → resolve: detected set → configured groups → static registry
//!     → connector.connect()  (one eth_requestAccounts round-trip)
//!     → ProviderSigner bound to the wallet's provider
//!     → WalletConnectionResult (uniform success/failure shape)
//! ```
//!
//! # Design Decisions
//! - Every failure mode collapses into the same result shape so callers
//!   branch on one flag instead of matching error types
//! - Zero accounts is a failure, never a connected-with-nothing success
//! - The registry fallback maps well-known aliases onto live detections;
//!   without a live provider behind it, the wallet is simply not found

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwap;
use thiserror::Error;

use crate::discovery::engine::DiscoveryEngine;
use crate::observability::metrics;
use crate::provider::transport::SharedProvider;
use crate::signer::factory::{ProviderSigner, WalletSigner};
use crate::wallet::connector::{ConnectorError, WalletConnector};
use crate::wallet::registry;
use crate::wallet::types::{ExtendedWallet, WalletInfo};

/// Lifecycle of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectPhase {
    Idle,
    Connecting,
    Connected,
    Failed,
}

/// Errors from wallet resolution and connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// No detected, configured, or registry-backed wallet matches the id.
    #[error("wallet not found: {0}")]
    NotFound(String),

    /// The wallet is known but has no connectable surface.
    #[error("wallet has no connector: {0}")]
    MissingConnector(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

/// Uniform outcome of a connection attempt. `success` is the single flag
/// callers branch on; the payload fields are populated only on success and
/// `error` only on failure.
#[derive(Clone)]
pub struct WalletConnectionResult {
    pub success: bool,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
    pub wallet: Option<WalletInfo>,
    pub provider: Option<SharedProvider>,
    pub signer: Option<Arc<dyn WalletSigner>>,
    pub error: Option<String>,
}

impl WalletConnectionResult {
    fn connected(
        address: Address,
        chain_id: Option<u64>,
        wallet: WalletInfo,
        provider: SharedProvider,
        signer: Arc<dyn WalletSigner>,
    ) -> Self {
        Self {
            success: true,
            address: Some(address),
            chain_id,
            wallet: Some(wallet),
            provider: Some(provider),
            signer: Some(signer),
            error: None,
        }
    }

    fn failed(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            address: None,
            chain_id: None,
            wallet: None,
            provider: None,
            signer: None,
            error: Some(error.to_string()),
        }
    }
}

impl fmt::Debug for WalletConnectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnectionResult")
            .field("success", &self.success)
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("wallet", &self.wallet)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Resolves wallet ids against all identity sources and drives the
/// connection round-trip.
pub struct ConnectionOrchestrator {
    engine: Arc<DiscoveryEngine>,
    configured: ArcSwap<BTreeMap<String, Vec<ExtendedWallet>>>,
    registry_fallback: bool,
    phase: ArcSwap<ConnectPhase>,
}

impl ConnectionOrchestrator {
    pub fn new(engine: Arc<DiscoveryEngine>) -> Self {
        Self {
            engine,
            configured: ArcSwap::from_pointee(BTreeMap::new()),
            registry_fallback: true,
            phase: ArcSwap::from_pointee(ConnectPhase::Idle),
        }
    }

    /// Disable or re-enable the static-registry alias fallback.
    pub fn with_registry_fallback(mut self, enabled: bool) -> Self {
        self.registry_fallback = enabled;
        self
    }

    /// Replace the configured wallet groups consulted during resolution.
    pub fn set_configured(&self, groups: BTreeMap<String, Vec<ExtendedWallet>>) {
        self.configured.store(Arc::new(groups));
    }

    pub fn phase(&self) -> ConnectPhase {
        **self.phase.load()
    }

    pub fn engine(&self) -> &Arc<DiscoveryEngine> {
        &self.engine
    }

    /// Connect to the wallet identified by `wallet_id`.
    ///
    /// Resolution order: live detections, configured groups, then the static
    /// registry mapped back onto live detections by identity. Every failure
    /// returns a result whose error names the requested id.
    pub async fn connect(&self, wallet_id: &str) -> WalletConnectionResult {
        self.phase.store(Arc::new(ConnectPhase::Connecting));
        tracing::info!(wallet_id, "Connecting wallet");

        let result = match self.resolve(wallet_id) {
            Ok((info, connector)) => self.finish(info, connector).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(result) => {
                self.phase.store(Arc::new(ConnectPhase::Connected));
                metrics::record_connect_attempt(wallet_id, true);
                result
            }
            Err(err) => {
                tracing::warn!(wallet_id, error = %err, "Connection failed");
                self.phase.store(Arc::new(ConnectPhase::Failed));
                metrics::record_connect_attempt(wallet_id, false);
                WalletConnectionResult::failed(err)
            }
        }
    }

    fn resolve(
        &self,
        wallet_id: &str,
    ) -> Result<(WalletInfo, Arc<dyn WalletConnector>), ConnectError> {
        if let Some(detected) = self.engine.wallet(wallet_id) {
            return Ok((detected.info(), detected.connector()));
        }

        if let Some(configured) = self.find_configured(wallet_id) {
            let connector = configured
                .connector()
                .ok_or_else(|| ConnectError::MissingConnector(wallet_id.to_string()))?;
            return Ok((configured.info(), connector));
        }

        // Registry aliases like "metamask" resolve to a live detection by
        // reverse-domain identity or display name. A profile with no live
        // provider behind it is not connectable.
        if let Some(profile) = registry::profile(wallet_id).filter(|_| self.registry_fallback) {
            let detected = self
                .engine
                .wallets()
                .iter()
                .find(|wallet| wallet.rdns == profile.rdns || wallet.name == profile.name)
                .cloned();
            if let Some(detected) = detected {
                tracing::debug!(wallet_id, rdns = %detected.rdns, "Registry alias resolved");
                return Ok((detected.info(), detected.connector()));
            }
        }

        Err(ConnectError::NotFound(wallet_id.to_string()))
    }

    fn find_configured(&self, wallet_id: &str) -> Option<ExtendedWallet> {
        self.configured
            .load()
            .values()
            .flatten()
            .find(|wallet| wallet.id == wallet_id || wallet.rdns.as_deref() == Some(wallet_id))
            .cloned()
    }

    async fn finish(
        &self,
        info: WalletInfo,
        connector: Arc<dyn WalletConnector>,
    ) -> Result<WalletConnectionResult, ConnectError> {
        let outcome = connector.connect().await?;
        // Connectors are required to reject empty account lists themselves;
        // hold custom ones to the same contract.
        let Some(&address) = outcome.accounts.first() else {
            return Err(ConnectError::Connector(ConnectorError::NoAccounts {
                wallet: info.name.clone(),
            }));
        };
        let provider = connector.provider();
        let signer = ProviderSigner::shared(provider.clone(), address);

        tracing::info!(
            wallet = %info.name,
            address = %address,
            chain_id = ?outcome.chain_id,
            "Connection established"
        );

        Ok(WalletConnectionResult::connected(
            address,
            outcome.chain_id,
            info,
            provider,
            signer,
        ))
    }
}

impl fmt::Debug for ConnectionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOrchestrator")
            .field("phase", &self.phase())
            .field("configured_groups", &self.configured.load().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::announce::AnnouncementBus;
    use crate::provider::injected::InjectedProviders;
    use crate::provider::testing::StubProvider;
    use crate::provider::transport::{BrandFlags, ProviderError};
    use crate::wallet::types::IconSource;
    use serde_json::json;
    use std::time::Duration;

    const ADDR: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn connectable_flags(flags: BrandFlags) -> Arc<StubProvider> {
        Arc::new(
            StubProvider::with_flags(flags)
                .stub("eth_requestAccounts", json!([ADDR]))
                .stub("eth_chainId", json!("0x1")),
        )
    }

    async fn engine_with_metamask() -> Arc<DiscoveryEngine> {
        let provider = connectable_flags(BrandFlags {
            is_metamask: true,
            ..Default::default()
        });
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::with_primary(provider),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        engine
    }

    #[tokio::test]
    async fn test_connect_detected_wallet() {
        let orchestrator = ConnectionOrchestrator::new(engine_with_metamask().await);

        let result = orchestrator.connect("io.metamask").await;
        assert!(result.success);
        assert_eq!(result.address.unwrap().to_string(), ADDR);
        assert_eq!(result.chain_id, Some(1));
        assert_eq!(result.wallet.unwrap().name, "MetaMask");
        assert!(result.signer.is_some());
        assert!(result.error.is_none());
        assert_eq!(orchestrator.phase(), ConnectPhase::Connected);
    }

    #[tokio::test]
    async fn test_registry_alias_resolves_to_detection() {
        let orchestrator = ConnectionOrchestrator::new(engine_with_metamask().await);

        // "metamask" is a registry alias, not a detected id.
        let result = orchestrator.connect("metamask").await;
        assert!(result.success);
        assert_eq!(result.wallet.unwrap().name, "MetaMask");
    }

    #[tokio::test]
    async fn test_unknown_wallet_error_names_the_id() {
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::none(),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        let result = orchestrator.connect("okx").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("okx"));
        assert!(result.address.is_none());
        assert!(result.signer.is_none());
        assert_eq!(orchestrator.phase(), ConnectPhase::Failed);
    }

    #[tokio::test]
    async fn test_registry_alias_without_detection_is_not_found() {
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::none(),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        // The profile exists, but no live provider backs it.
        let result = orchestrator.connect("metamask").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("metamask"));
    }

    #[tokio::test]
    async fn test_configured_wallet_is_connectable() {
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::none(),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        let provider: SharedProvider = Arc::new(
            StubProvider::new()
                .stub("eth_requestAccounts", json!([ADDR]))
                .stub("eth_chainId", json!("0x38")),
        );
        let mut wallet = ExtendedWallet::new("okx", "OKX Wallet", IconSource::Url(String::new()));
        wallet.provider = Some(provider);
        orchestrator.set_configured(BTreeMap::from([("Popular".to_string(), vec![wallet])]));

        let result = orchestrator.connect("okx").await;
        assert!(result.success);
        assert_eq!(result.chain_id, Some(0x38));
    }

    #[tokio::test]
    async fn test_configured_wallet_without_connector() {
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::none(),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        let wallet = ExtendedWallet::new("okx", "OKX Wallet", IconSource::Url(String::new()));
        orchestrator.set_configured(BTreeMap::from([("Popular".to_string(), vec![wallet])]));

        let result = orchestrator.connect("okx").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("okx"));
    }

    #[tokio::test]
    async fn test_empty_accounts_fails_uniformly() {
        let provider = Arc::new(
            StubProvider::with_flags(BrandFlags {
                is_metamask: true,
                ..Default::default()
            })
            .stub("eth_requestAccounts", json!([]))
            .stub("eth_chainId", json!("0x1")),
        );
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::with_primary(provider),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        let result = orchestrator.connect("io.metamask").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("no accounts"));
    }

    #[tokio::test]
    async fn test_user_rejection_fails_uniformly() {
        let provider = Arc::new(
            StubProvider::with_flags(BrandFlags {
                is_metamask: true,
                ..Default::default()
            })
            .stub_err(
                "eth_requestAccounts",
                ProviderError::Rpc {
                    code: ProviderError::USER_REJECTED,
                    message: "User rejected the request".into(),
                },
            ),
        );
        let engine = DiscoveryEngine::with_settle_window(
            AnnouncementBus::new(),
            InjectedProviders::with_primary(provider),
            Duration::from_millis(5),
        );
        engine.initialize().await;
        let orchestrator = ConnectionOrchestrator::new(engine);

        let result = orchestrator.connect("io.metamask").await;
        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("User rejected"));
    }
}
