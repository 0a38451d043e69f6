//! Standardized provider announcement channel.
//!
//! # Responsibilities
//! - Replace the global announce/request event pattern with an explicit
//!   publish-subscribe channel
//! - Count dispatched request signals so duplicate-listener bugs are testable
//!
//! # Design Decisions
//! - The bus only transports announcements; validation of their content is
//!   the discovery engine's job
//! - Announcements may arrive at any time after a request signal, including
//!   after the engine's settle window (late joins are still delivered)

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::provider::transport::SharedProvider;

/// Self-reported identity carried by an announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderInfo {
    pub uuid: Uuid,
    pub name: String,
    pub icon: String,
    /// Reverse-domain identity, the primary cross-mechanism dedup key.
    pub rdns: String,
}

/// One announced provider: identity plus a shared provider reference.
#[derive(Clone)]
pub struct ProviderAnnouncement {
    pub info: ProviderInfo,
    pub provider: SharedProvider,
}

impl fmt::Debug for ProviderAnnouncement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderAnnouncement")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Publish-subscribe channel between wallet-side announcers and the
/// discovery engine.
pub struct AnnouncementBus {
    requests: broadcast::Sender<()>,
    announcements: broadcast::Sender<ProviderAnnouncement>,
    requests_dispatched: AtomicU64,
}

impl AnnouncementBus {
    const CHANNEL_CAPACITY: usize = 64;

    pub fn new() -> Arc<Self> {
        let (requests, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        let (announcements, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        Arc::new(Self {
            requests,
            announcements,
            requests_dispatched: AtomicU64::new(0),
        })
    }

    /// Broadcast a request signal to every wallet-side subscriber.
    ///
    /// Having no subscribers is not an error: a page without extensions
    /// simply discovers nothing.
    pub fn request_announcements(&self) {
        self.requests_dispatched.fetch_add(1, Ordering::SeqCst);
        let receivers = self.requests.send(()).unwrap_or(0);
        tracing::debug!(receivers, "Dispatched provider announcement request");
    }

    /// Number of request signals dispatched over the bus lifetime.
    pub fn requests_dispatched(&self) -> u64 {
        self.requests_dispatched.load(Ordering::SeqCst)
    }

    /// Subscribe to request signals (wallet side).
    pub fn subscribe_requests(&self) -> broadcast::Receiver<()> {
        self.requests.subscribe()
    }

    /// Subscribe to announcements (engine side).
    pub fn subscribe(&self) -> broadcast::Receiver<ProviderAnnouncement> {
        self.announcements.subscribe()
    }

    /// Publish an announcement (wallet side).
    pub fn announce(&self, announcement: ProviderAnnouncement) {
        let receivers = self.announcements.send(announcement).unwrap_or(0);
        if receivers == 0 {
            tracing::debug!("Announcement published with no engine subscribed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::StubProvider;

    fn announcement(name: &str, rdns: &str) -> ProviderAnnouncement {
        ProviderAnnouncement {
            info: ProviderInfo {
                uuid: Uuid::new_v4(),
                name: name.to_string(),
                icon: "data:,".to_string(),
                rdns: rdns.to_string(),
            },
            provider: Arc::new(StubProvider::new()),
        }
    }

    #[tokio::test]
    async fn test_request_count_increments() {
        let bus = AnnouncementBus::new();
        assert_eq!(bus.requests_dispatched(), 0);
        bus.request_announcements();
        bus.request_announcements();
        assert_eq!(bus.requests_dispatched(), 2);
    }

    #[tokio::test]
    async fn test_announcement_delivery() {
        let bus = AnnouncementBus::new();
        let mut rx = bus.subscribe();
        bus.announce(announcement("MetaMask", "io.metamask"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.info.rdns, "io.metamask");
    }

    #[tokio::test]
    async fn test_wallet_side_sees_request() {
        let bus = AnnouncementBus::new();
        let mut requests = bus.subscribe_requests();
        bus.request_announcements();
        requests.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let bus = AnnouncementBus::new();
        bus.announce(announcement("Rabby", "io.rabby"));
        bus.request_announcements();
    }
}
