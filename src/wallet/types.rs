//! Wallet descriptor types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::provider::transport::SharedProvider;
use crate::wallet::connector::{ProviderConnector, WalletConnector};

/// How a wallet entered the detected set. Used as the tie-break priority
/// signal during deduplication: standardized identities are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionOrigin {
    Standardized,
    Legacy,
    WalletConnect,
}

impl fmt::Display for DetectionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionOrigin::Standardized => write!(f, "standardized"),
            DetectionOrigin::Legacy => write!(f, "legacy"),
            DetectionOrigin::WalletConnect => write!(f, "walletconnect"),
        }
    }
}

/// Factory producing a connector bound to one wallet's provider.
pub type ConnectorFactory = Arc<dyn Fn() -> Arc<dyn WalletConnector> + Send + Sync>;

/// A wallet provider found at runtime by the discovery engine.
#[derive(Clone)]
pub struct DetectedWallet {
    /// Announced rdns, or `{rdns}-{index}` for legacy detections.
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    /// Reverse-domain identity, the primary dedup key.
    pub rdns: String,
    /// Shared reference to the externally owned provider.
    pub provider: SharedProvider,
    /// Always true for anything placed in the detected set.
    pub installed: bool,
    pub origin: DetectionOrigin,
    pub connector_factory: Option<ConnectorFactory>,
}

impl DetectedWallet {
    /// Connector for this wallet: the registered factory when one exists,
    /// otherwise a plain provider connector.
    pub fn connector(&self) -> Arc<dyn WalletConnector> {
        match &self.connector_factory {
            Some(factory) => factory(),
            None => Arc::new(ProviderConnector::new(self.provider.clone(), &self.name)),
        }
    }

    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            installed: self.installed,
        }
    }

    /// Project this detection into a configured-wallet descriptor so the
    /// detected set can be presented alongside configured groups.
    pub fn to_extended(&self) -> ExtendedWallet {
        let mut wallet = ExtendedWallet::new(
            &self.id,
            &self.name,
            IconSource::Url(self.icon.clone().unwrap_or_default()),
        );
        wallet.rdns = Some(self.rdns.clone());
        wallet.installed = true;
        wallet.origin = Some(self.origin);
        wallet.provider = Some(self.provider.clone());
        wallet.connector_factory = self.connector_factory.clone();
        wallet
    }
}

impl fmt::Debug for DetectedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectedWallet")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rdns", &self.rdns)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Identity fields projected into connection results and context state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
    pub id: String,
    pub name: String,
    pub installed: bool,
}

/// Icon for a configured wallet: a ready string or an asynchronous producer
/// resolved once and cached.
#[derive(Clone)]
pub enum IconSource {
    Url(String),
    Resolver(Arc<dyn Fn() -> BoxFuture<'static, Option<String>> + Send + Sync>),
}

impl fmt::Debug for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            IconSource::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// A configured (non-runtime-detected) wallet descriptor supplied by the
/// hosting application, e.g. for a curated picker list.
#[derive(Clone)]
pub struct ExtendedWallet {
    pub id: String,
    pub name: String,
    pub rdns: Option<String>,
    pub installed: bool,
    pub origin: Option<DetectionOrigin>,
    pub provider: Option<SharedProvider>,
    pub connector_factory: Option<ConnectorFactory>,
    pub icon: IconSource,
    icon_resolved: Arc<OnceCell<Option<String>>>,
}

impl ExtendedWallet {
    pub fn new(id: &str, name: &str, icon: IconSource) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rdns: None,
            installed: false,
            origin: None,
            provider: None,
            connector_factory: None,
            icon,
            icon_resolved: Arc::new(OnceCell::new()),
        }
    }

    /// Resolve the icon, invoking an asynchronous producer at most once.
    /// Clones share the cache.
    pub async fn resolve_icon(&self) -> Option<String> {
        self.icon_resolved
            .get_or_init(|| async {
                match &self.icon {
                    IconSource::Url(url) => Some(url.clone()),
                    IconSource::Resolver(producer) => producer().await,
                }
            })
            .await
            .clone()
    }

    /// Whether the icon has already been resolved.
    pub fn icon_loaded(&self) -> bool {
        self.icon_resolved.initialized()
    }

    /// The cached icon, when resolution has already happened.
    pub fn icon_resolved(&self) -> Option<String> {
        self.icon_resolved.get().cloned().flatten()
    }

    /// Connector for this wallet, when it has one: the registered factory
    /// first, a plain provider connector second, nothing otherwise.
    pub fn connector(&self) -> Option<Arc<dyn WalletConnector>> {
        if let Some(factory) = &self.connector_factory {
            return Some(factory());
        }
        self.provider
            .as_ref()
            .map(|provider| -> Arc<dyn WalletConnector> {
                Arc::new(ProviderConnector::new(provider.clone(), &self.name))
            })
    }

    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            installed: self.installed,
        }
    }
}

impl fmt::Debug for ExtendedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedWallet")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("rdns", &self.rdns)
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

/// Deployment-specific branding handed to configured wallet factories.
#[derive(Debug, Clone)]
pub struct WalletBuildConfig {
    pub project_id: String,
    pub app_name: String,
}

/// Factory contract for configured wallet entries, invoked once per entry
/// at initialization.
pub type WalletBuilder = Arc<dyn Fn(&WalletBuildConfig) -> ExtendedWallet + Send + Sync>;

/// A named group of configured wallet factories.
pub struct WalletGroup {
    pub group_name: String,
    pub builders: Vec<WalletBuilder>,
}

/// Materialize configured wallet groups with deployment branding.
pub fn materialize_groups(
    groups: &[WalletGroup],
    config: &WalletBuildConfig,
) -> BTreeMap<String, Vec<ExtendedWallet>> {
    let mut out = BTreeMap::new();
    for group in groups {
        if group.group_name.is_empty() {
            continue;
        }
        let wallets: Vec<ExtendedWallet> =
            group.builders.iter().map(|build| build(config)).collect();
        if !wallets.is_empty() {
            out.insert(group.group_name.clone(), wallets);
        }
    }
    out
}
