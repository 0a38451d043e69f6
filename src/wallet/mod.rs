//! Wallet model: detected wallets, configured wallets, connectors, registry.
//!
//! # Data Flow
//! ```text
//! discovery engine
//!     → types.rs (DetectedWallet / ExtendedWallet descriptors)
//!     → connector.rs (connect/disconnect capability per wallet)
//!     → registry.rs (static fallback profiles for well-known brands)
//!     → icons.rs (lazy, cached icon resolution for configured wallets)
//! ```

pub mod connector;
pub mod icons;
pub mod registry;
pub mod types;

pub use connector::{ConnectOutcome, ConnectorError, ProviderConnector, WalletConnector};
pub use registry::{WalletProfile, WALLET_REGISTRY};
pub use types::{
    DetectedWallet, DetectionOrigin, ExtendedWallet, IconSource, WalletBuildConfig, WalletBuilder,
    WalletGroup, WalletInfo,
};
