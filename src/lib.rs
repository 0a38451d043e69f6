//! Injected Ethereum Wallet Hub
//!
//! Discovery, deduplication and connection orchestration for browser-style
//! injected Ethereum providers.
//!
//! # Architecture Overview
//!
//! ```text
//!   announced providers          injected provider slot
//!   (announce/request bus)       (+ providers array)
//!          │                              │
//!          ▼                              ▼
//!   ┌─────────────────────────────────────────────┐
//!   │              discovery engine               │
//!   │   standardized channel + legacy detectors   │
//!   └──────────────────────┬──────────────────────┘
//!                          ▼
//!   ┌─────────────────────────────────────────────┐
//!   │           deduplication engine              │
//!   │  detected set  +  configured wallet groups  │
//!   └──────────────────────┬──────────────────────┘
//!                          ▼
//!   ┌─────────────────────────────────────────────┐
//!   │          connection orchestrator            │
//!   │  detected → configured → static registry    │
//!   └──────────────────────┬──────────────────────┘
//!                          ▼
//!   ┌──────────────┐   ┌──────────────────────────┐
//!   │signer factory│──▶│  wallet context (state)  │
//!   │  + adapter   │   │ connect/disconnect/chain │
//!   └──────────────┘   └──────────────────────────┘
//! ```
//!
//! The hub never holds keys and never signs anything itself: every signing
//! and transaction operation is delegated to an externally supplied provider
//! through its `request` boundary.

pub mod config;
pub mod connect;
pub mod discovery;
pub mod hub;
pub mod observability;
pub mod provider;
pub mod signer;
pub mod wallet;

pub use config::HubConfig;
pub use connect::{ConnectionOrchestrator, WalletConnectionResult, WalletContext};
pub use discovery::DiscoveryEngine;
pub use hub::WalletHub;
pub use provider::{AnnouncementBus, EthereumProvider, SharedProvider};
pub use signer::{ProviderSigner, SignerAdapter, WalletSigner};
pub use wallet::{DetectedWallet, DetectionOrigin, ExtendedWallet};
