//! Discovery engine: standardized announcements plus legacy injection scan.
//!
//! # Responsibilities
//! - Run both discovery channels on initialization
//! - Keep an eventually-consistent detected set that late announcements can
//!   still join
//! - Guarantee idempotent initialization: one announcement request per
//!   engine lifecycle, no duplicate listeners
//!
//! # Design Decisions
//! - The set is keyed by reverse-domain identity; a standardized
//!   announcement overwrites a legacy detection of the same identity, never
//!   the other way around
//! - Readers get a lock-free snapshot that is re-derived after every change

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::discovery::detectors;
use crate::observability::metrics;
use crate::provider::announce::{AnnouncementBus, ProviderAnnouncement};
use crate::provider::injected::InjectedProviders;
use crate::wallet::registry;
use crate::wallet::types::{DetectedWallet, DetectionOrigin};

/// Default announcement collection phase.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(150);

pub struct DiscoveryEngine {
    bus: Arc<AnnouncementBus>,
    injected: InjectedProviders,
    settle_window: Duration,
    wallets: DashMap<String, DetectedWallet>,
    snapshot: ArcSwap<Vec<DetectedWallet>>,
    initialized: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl DiscoveryEngine {
    pub fn new(bus: Arc<AnnouncementBus>, injected: InjectedProviders) -> Arc<Self> {
        Self::with_settle_window(bus, injected, DEFAULT_SETTLE_WINDOW)
    }

    pub fn with_settle_window(
        bus: Arc<AnnouncementBus>,
        injected: InjectedProviders,
        settle_window: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            bus,
            injected,
            settle_window,
            wallets: DashMap::new(),
            snapshot: ArcSwap::from_pointee(Vec::new()),
            initialized: AtomicBool::new(false),
            listener: Mutex::new(None),
        })
    }

    /// Run both discovery channels and wait out the settle window.
    ///
    /// Idempotent: every call after the first returns the current set
    /// without re-scanning or dispatching another announcement request. The
    /// announcement listener keeps running afterwards, so the returned set
    /// is a snapshot, not a final answer.
    pub async fn initialize(self: &Arc<Self>) -> Arc<Vec<DetectedWallet>> {
        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Discovery engine already initialized, returning existing set");
            return self.wallets();
        }

        tracing::info!(
            injected = !self.injected.is_empty(),
            settle_ms = self.settle_window.as_millis() as u64,
            "Initializing wallet discovery"
        );

        // Subscribe before dispatching the request so no announcement can
        // slip between the two.
        let receiver = self.bus.subscribe();
        let handle = tokio::spawn(Self::collect_announcements(
            Arc::downgrade(self),
            receiver,
        ));
        *self.listener.lock().unwrap() = Some(handle);

        self.scan_injected();
        self.bus.request_announcements();

        tokio::time::sleep(self.settle_window).await;
        self.wallets()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Current detected set. Eventually consistent; re-read after the
    /// snapshot reference changes.
    pub fn wallets(&self) -> Arc<Vec<DetectedWallet>> {
        self.snapshot.load_full()
    }

    /// Look up one wallet by id or reverse-domain identity.
    pub fn wallet(&self, id: &str) -> Option<DetectedWallet> {
        self.snapshot
            .load()
            .iter()
            .find(|wallet| wallet.id == id || wallet.rdns == id)
            .cloned()
    }

    pub fn is_installed(&self, id: &str) -> bool {
        self.wallet(id).is_some()
    }

    /// Stop collecting late announcements. The detected set stays readable.
    pub fn stop(&self) {
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
    }

    async fn collect_announcements(
        engine: Weak<DiscoveryEngine>,
        mut receiver: broadcast::Receiver<ProviderAnnouncement>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(announcement) => match engine.upgrade() {
                    Some(engine) => engine.add_announced(announcement),
                    None => break,
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Announcement listener lagged, announcements lost");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Standardized channel: announced identity is trusted as-is, no flag
    /// inspection. Malformed payloads are discarded, never surfaced.
    fn add_announced(&self, announcement: ProviderAnnouncement) {
        let info = &announcement.info;
        if info.name.trim().is_empty() || info.rdns.trim().is_empty() {
            tracing::debug!(?info, "Discarding malformed announcement");
            metrics::record_announcement_discarded();
            return;
        }

        let wallet = DetectedWallet {
            id: info.rdns.clone(),
            name: info.name.clone(),
            icon: (!info.icon.is_empty()).then(|| info.icon.clone()),
            rdns: info.rdns.clone(),
            provider: announcement.provider.clone(),
            installed: true,
            origin: DetectionOrigin::Standardized,
            connector_factory: None,
        };

        match self.wallets.insert(info.rdns.clone(), wallet) {
            Some(previous) if previous.origin == DetectionOrigin::Legacy => {
                tracing::info!(
                    rdns = %info.rdns,
                    "Standardized announcement replaced legacy detection"
                );
            }
            Some(_) => tracing::debug!(rdns = %info.rdns, "Duplicate announcement refreshed"),
            None => {
                tracing::info!(name = %info.name, rdns = %info.rdns, "Wallet announced");
                metrics::record_wallet_detected(DetectionOrigin::Standardized);
            }
        }
        self.refresh_snapshot();
    }

    /// Legacy channel: inspect the injected slot and its providers array
    /// with the brand detectors. An absent slot yields an empty legacy set.
    fn scan_injected(&self) {
        let candidates = self.injected.candidates();
        if candidates.is_empty() {
            tracing::debug!("No injected provider slot, skipping legacy scan");
            return;
        }

        for (index, provider) in candidates.iter().enumerate() {
            let flags = provider.brand_flags();
            let Some(detector) = detectors::identify(&flags) else {
                tracing::debug!(index, "Injected provider matched no brand detector");
                continue;
            };

            // A legacy detection never overwrites an existing entry.
            if self.wallets.contains_key(detector.rdns) {
                tracing::debug!(rdns = detector.rdns, "Identity already detected, skipping");
                continue;
            }

            let wallet = DetectedWallet {
                id: format!("{}-{}", detector.rdns, index),
                name: detector.name.to_string(),
                icon: Some(registry::placeholder_icon(detector.rdns).to_string()),
                rdns: detector.rdns.to_string(),
                provider: provider.clone(),
                installed: true,
                origin: DetectionOrigin::Legacy,
                connector_factory: None,
            };

            tracing::info!(name = detector.name, rdns = detector.rdns, "Wallet detected (legacy)");
            metrics::record_wallet_detected(DetectionOrigin::Legacy);
            self.wallets.insert(detector.rdns.to_string(), wallet);
        }
        self.refresh_snapshot();
    }

    fn refresh_snapshot(&self) {
        let mut wallets: Vec<DetectedWallet> =
            self.wallets.iter().map(|entry| entry.value().clone()).collect();
        wallets.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.rdns.cmp(&b.rdns)));
        self.snapshot.store(Arc::new(wallets));
    }
}

impl Drop for DiscoveryEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.lock().unwrap().take() {
            handle.abort();
        }
    }
}
