//! Brand detectors for legacy provider injection.
//!
//! Each detector is a pure predicate over the boolean brand flags a provider
//! carries. A provider may satisfy several brand flags at once (injection
//! conflicts, wallets masquerading as MetaMask), so the list is applied in a
//! fixed priority order and the first match wins; the MetaMask predicate
//! carries explicit negative conditions for the known masqueraders.

use crate::provider::transport::BrandFlags;

/// One brand detector: identity plus a side-effect-free predicate.
#[derive(Clone, Copy)]
pub struct WalletDetector {
    pub id: &'static str,
    pub name: &'static str,
    pub rdns: &'static str,
    predicate: fn(&BrandFlags) -> bool,
}

impl WalletDetector {
    pub fn detect(&self, flags: &BrandFlags) -> bool {
        (self.predicate)(flags)
    }
}

impl std::fmt::Debug for WalletDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletDetector")
            .field("id", &self.id)
            .field("rdns", &self.rdns)
            .finish()
    }
}

/// Fixed priority list. First match wins.
pub const DETECTORS: &[WalletDetector] = &[
    WalletDetector {
        id: "metamask",
        name: "MetaMask",
        rdns: "io.metamask",
        // OKX and Rabby both set isMetaMask for compatibility.
        predicate: |f| f.is_metamask && !f.is_okx_wallet && !f.is_rabby,
    },
    WalletDetector {
        id: "okx",
        name: "OKX Wallet",
        rdns: "com.okx.wallet",
        predicate: |f| f.is_okx_wallet || f.is_okex_wallet,
    },
    WalletDetector {
        id: "coinbase",
        name: "Coinbase Wallet",
        rdns: "com.coinbase.wallet",
        predicate: |f| f.is_coinbase_wallet,
    },
    WalletDetector {
        id: "rabby",
        name: "Rabby Wallet",
        rdns: "io.rabby",
        predicate: |f| f.is_rabby,
    },
    WalletDetector {
        id: "trust",
        name: "Trust Wallet",
        rdns: "com.trustwallet.app",
        predicate: |f| f.is_trust || f.is_trust_wallet,
    },
];

/// Identify a provider's brand, if any. Never errors: an unflagged provider
/// simply has no identifiable brand.
pub fn identify(flags: &BrandFlags) -> Option<&'static WalletDetector> {
    DETECTORS.iter().find(|detector| detector.detect(flags))
}
