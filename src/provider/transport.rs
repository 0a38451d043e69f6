//! The `request` boundary every injected provider exposes.
//!
//! # Responsibilities
//! - Define the object-safe provider trait consumed by every other subsystem
//! - Carry JSON-RPC error codes through so callers can recognize
//!   wallet-specific conditions (user rejection, unrecognized chain)
//! - Decode the handful of response shapes the hub cares about

use alloy::primitives::Address;
use async_trait::async_trait;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by a provider round-trip.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider returned a JSON-RPC error object.
    #[error("provider rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The round-trip to the extension failed entirely.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider answered with a shape the hub cannot decode.
    #[error("malformed provider response: {0}")]
    BadResponse(String),
}

impl ProviderError {
    /// EIP-1193 code for "user rejected the request".
    pub const USER_REJECTED: i64 = 4001;
    /// Wallet-specific code for "chain has not been added to the wallet".
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;

    /// The JSON-RPC error code, when the provider supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Brand flags injected providers set on themselves.
///
/// A single provider may set several flags at once (provider-injection
/// conflicts are common); the detector list resolves those collisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrandFlags {
    pub is_metamask: bool,
    pub is_okx_wallet: bool,
    pub is_okex_wallet: bool,
    pub is_coinbase_wallet: bool,
    pub is_rabby: bool,
    pub is_trust: bool,
    pub is_trust_wallet: bool,
}

/// An externally supplied Ethereum provider.
///
/// Methods consumed by the hub: `eth_requestAccounts`, `eth_chainId`,
/// `eth_getTransactionCount`, `personal_sign`, `eth_signTransaction`,
/// `eth_sendTransaction`, `eth_sendRawTransaction`, `eth_estimateGas`,
/// `eth_call`, `eth_getTransactionReceipt`, `wallet_switchEthereumChain`
/// and `wallet_addEthereumChain`.
#[async_trait]
pub trait EthereumProvider: Send + Sync {
    /// Perform one JSON-RPC style round-trip against the provider.
    async fn request(&self, method: &str, params: Value) -> ProviderResult<Value>;

    /// Brand flags the provider advertises. Defaults to none.
    fn brand_flags(&self) -> BrandFlags {
        BrandFlags::default()
    }
}

/// Shared reference to an externally owned provider.
pub type SharedProvider = Arc<dyn EthereumProvider>;

/// Request the provider's account list via `eth_requestAccounts`.
pub async fn request_accounts(provider: &dyn EthereumProvider) -> ProviderResult<Vec<Address>> {
    let raw = provider
        .request("eth_requestAccounts", Value::Array(Vec::new()))
        .await?;
    decode_accounts(&raw)
}

/// Decode an account-list response.
///
/// Accepts an array of address strings or a single address string. Entries
/// that fail to parse are dropped rather than failing the whole response.
pub fn decode_accounts(raw: &Value) -> ProviderResult<Vec<Address>> {
    let entries: Vec<&str> = match raw {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        other => {
            return Err(ProviderError::BadResponse(format!(
                "expected account list, got {other}"
            )))
        }
    };

    let mut accounts = Vec::with_capacity(entries.len());
    for entry in entries {
        match Address::from_str(entry) {
            Ok(address) => accounts.push(address),
            Err(_) => tracing::debug!(entry, "Discarding unparseable account entry"),
        }
    }
    Ok(accounts)
}

/// Best-effort chain id lookup via `eth_chainId`.
///
/// A failed call or an unparseable answer yields `None`, never an error.
pub async fn chain_id(provider: &dyn EthereumProvider) -> Option<u64> {
    match provider.request("eth_chainId", Value::Array(Vec::new())).await {
        Ok(value) => parse_quantity(&value),
        Err(e) => {
            tracing::warn!(error = %e, "eth_chainId failed");
            None
        }
    }
}

/// Parse a JSON-RPC quantity: a `0x`-prefixed hex string or a plain number.
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => {
            let digits = s.strip_prefix("0x")?;
            u64::from_str_radix(digits, 16).ok()
        }
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Encode a quantity the way wallet RPC methods expect it.
pub fn hex_quantity(value: u64) -> String {
    format!("0x{value:x}")
}
