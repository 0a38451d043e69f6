//! End-to-end discovery and deduplication flows.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::MockProvider;
use wallet_hub::config::HubConfig;
use wallet_hub::hub::WalletHub;
use wallet_hub::provider::announce::AnnouncementBus;
use wallet_hub::provider::injected::InjectedProviders;
use wallet_hub::provider::transport::BrandFlags;
use wallet_hub::wallet::types::{
    ExtendedWallet, IconSource, WalletBuildConfig, WalletBuilder, WalletGroup,
};
use wallet_hub::wallet::DetectionOrigin;

fn fast_config() -> HubConfig {
    let mut config = HubConfig::default();
    config.app_name = "Demo".to_string();
    config.project_id = "pid-1".to_string();
    config.discovery.settle_window_ms = 30;
    config
}

fn metamask_flags() -> BrandFlags {
    BrandFlags {
        is_metamask: true,
        ..Default::default()
    }
}

fn configured_metamask_group() -> WalletGroup {
    WalletGroup {
        group_name: "Popular".to_string(),
        builders: vec![
            Arc::new(|_: &WalletBuildConfig| {
                ExtendedWallet::new("metamask", "MetaMask", IconSource::Url("data:,mm".into()))
            }) as WalletBuilder,
            Arc::new(|_: &WalletBuildConfig| {
                ExtendedWallet::new("okx", "OKX Wallet", IconSource::Url("data:,okx".into()))
            }) as WalletBuilder,
        ],
    }
}

/// The same wallet surfacing three ways at once: an announcement, a legacy
/// brand flag, and a configured entry. Exactly one standardized entry must
/// survive.
#[tokio::test]
async fn triple_metamask_collapses_to_one_standardized_entry() {
    let bus = AnnouncementBus::new();
    let legacy = InjectedProviders::with_primary(Arc::new(MockProvider::with_flags(
        metamask_flags(),
    )));
    common::spawn_announcer(&bus, "MetaMask", "io.metamask", Arc::new(MockProvider::new()));

    let mut hub = WalletHub::new(fast_config(), bus, legacy);
    hub.configure_wallets(&[configured_metamask_group()]).await;
    hub.initialize().await;

    let view = hub.wallet_view();
    assert_eq!(view.filtered.len(), 1);
    assert_eq!(view.filtered[0].origin, DetectionOrigin::Standardized);
    assert_eq!(view.filtered[0].id, "io.metamask");

    // The configured MetaMask is shadowed; OKX survives.
    let popular = &view.static_filtered["Popular"];
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].id, "okx");
}

#[tokio::test]
async fn initialize_dispatches_exactly_one_request() {
    let bus = AnnouncementBus::new();
    let hub = WalletHub::new(fast_config(), bus.clone(), InjectedProviders::none());

    let first = hub.initialize().await;
    let second = hub.initialize().await;

    assert_eq!(bus.requests_dispatched(), 1);
    assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn late_announcement_joins_after_settle_window() {
    let bus = AnnouncementBus::new();
    let hub = WalletHub::new(fast_config(), bus.clone(), InjectedProviders::none());

    let initial = hub.initialize().await;
    assert!(initial.is_empty());

    // Announce well after the settle window has elapsed.
    common::spawn_announcer(&bus, "Rabby Wallet", "io.rabby", Arc::new(MockProvider::new()));
    bus.request_announcements();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let wallets = hub.engine().wallets();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].rdns, "io.rabby");
}

#[tokio::test]
async fn legacy_only_wallet_keeps_indexed_id() {
    let bus = AnnouncementBus::new();
    let mut injected = InjectedProviders::none();
    injected.push(Arc::new(MockProvider::with_flags(BrandFlags {
        is_rabby: true,
        ..Default::default()
    })));

    let hub = WalletHub::new(fast_config(), bus, injected);
    let wallets = hub.initialize().await;

    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].id, "io.rabby-0");
    assert_eq!(wallets[0].origin, DetectionOrigin::Legacy);
}

#[tokio::test]
async fn view_never_repeats_an_identity() {
    let bus = AnnouncementBus::new();
    let mut injected = InjectedProviders::none();
    injected.push(Arc::new(MockProvider::with_flags(metamask_flags())));
    injected.push(Arc::new(MockProvider::with_flags(BrandFlags {
        is_rabby: true,
        ..Default::default()
    })));
    common::spawn_announcer(&bus, "MetaMask", "io.metamask", Arc::new(MockProvider::new()));

    let mut hub = WalletHub::new(fast_config(), bus, injected);
    hub.configure_wallets(&[configured_metamask_group()]).await;
    hub.initialize().await;

    let grouped = hub.grouped_wallets("Installed");
    let mut names: Vec<String> = Vec::new();
    for wallets in grouped.values() {
        names.extend(wallets.iter().map(|w| w.name.trim().to_lowercase()));
    }
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}
