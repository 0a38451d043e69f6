//! Static registry of well-known wallet profiles.
//!
//! Fallback identity source for wallets neither detected at runtime nor
//! configured by the hosting application; also supplies placeholder icons
//! for legacy detections, which carry no announced icon.

/// One well-known wallet brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub rdns: &'static str,
    pub icon: &'static str,
}

/// All supported brands, in detector priority order.
pub const WALLET_REGISTRY: &[WalletProfile] = &[
    WalletProfile {
        id: "metamask",
        name: "MetaMask",
        rdns: "io.metamask",
        icon: "🦊",
    },
    WalletProfile {
        id: "okx",
        name: "OKX Wallet",
        rdns: "com.okx.wallet",
        icon: "⭕",
    },
    WalletProfile {
        id: "coinbase",
        name: "Coinbase Wallet",
        rdns: "com.coinbase.wallet",
        icon: "🔵",
    },
    WalletProfile {
        id: "rabby",
        name: "Rabby Wallet",
        rdns: "io.rabby",
        icon: "🐰",
    },
    WalletProfile {
        id: "trust",
        name: "Trust Wallet",
        rdns: "com.trustwallet.app",
        icon: "🛡️",
    },
];

/// Placeholder shown for brands the registry does not know.
pub const FALLBACK_ICON: &str = "💼";

pub fn profile(id: &str) -> Option<&'static WalletProfile> {
    WALLET_REGISTRY.iter().find(|profile| profile.id == id)
}

pub fn profile_by_rdns(rdns: &str) -> Option<&'static WalletProfile> {
    WALLET_REGISTRY.iter().find(|profile| profile.rdns == rdns)
}

pub fn placeholder_icon(rdns: &str) -> &'static str {
    profile_by_rdns(rdns).map_or(FALLBACK_ICON, |profile| profile.icon)
}
