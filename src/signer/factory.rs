//! Signer factory: signing capability backed by a raw provider.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::transport::{self, SharedProvider};
use crate::signer::types::{SignerCapabilities, SignerError, SignerResult, TransactionRequest};

/// The hub's internal signing capability, independent of any specific
/// transaction-library signer shape.
///
/// Only address retrieval and message signing are mandatory; everything
/// else defaults to a descriptive capability-gap error, and implementors
/// advertise what they actually support through `capabilities()`.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn address(&self) -> Address;

    async fn sign_message(&self, message: &str) -> SignerResult<String>;

    /// Declared once at construction; never re-probed at call sites.
    fn capabilities(&self) -> SignerCapabilities {
        SignerCapabilities::MINIMAL
    }

    /// The provider this signer is bound to, when it has one.
    fn provider(&self) -> Option<SharedProvider> {
        None
    }

    async fn sign_transaction(&self, _tx: &TransactionRequest) -> SignerResult<String> {
        Err(SignerError::Unsupported("signTransaction"))
    }

    async fn send_transaction(&self, _tx: &TransactionRequest) -> SignerResult<B256> {
        Err(SignerError::Unsupported("sendTransaction"))
    }

    async fn get_nonce(&self, _block_tag: Option<&str>) -> SignerResult<u64> {
        Err(SignerError::Unsupported("getNonce"))
    }

    /// Rebind to a replacement provider, returning a NEW signer for the
    /// same address. The original signer is left untouched.
    fn with_provider(&self, provider: SharedProvider) -> Arc<dyn WalletSigner>;
}

/// Signer whose every operation is a single JSON-RPC round-trip against the
/// bound provider. Holds no key material.
#[derive(Clone)]
pub struct ProviderSigner {
    provider: SharedProvider,
    address: Address,
}

impl ProviderSigner {
    pub fn from_provider(provider: SharedProvider, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn shared(provider: SharedProvider, address: Address) -> Arc<dyn WalletSigner> {
        Arc::new(Self::from_provider(provider, address))
    }

    fn expect_string(value: Value, what: &str) -> SignerResult<String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(SignerError::BadResponse(format!(
                "expected {what} string, got {other}"
            ))),
        }
    }
}

impl fmt::Debug for ProviderSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletSigner for ProviderSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn capabilities(&self) -> SignerCapabilities {
        SignerCapabilities::FULL
    }

    fn provider(&self) -> Option<SharedProvider> {
        Some(self.provider.clone())
    }

    async fn sign_message(&self, message: &str) -> SignerResult<String> {
        let raw = self
            .provider
            .request("personal_sign", json!([message, self.address]))
            .await?;
        Self::expect_string(raw, "signature")
    }

    async fn sign_transaction(&self, tx: &TransactionRequest) -> SignerResult<String> {
        let raw = self
            .provider
            .request("eth_signTransaction", json!([tx]))
            .await?;
        Self::expect_string(raw, "signed transaction")
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> SignerResult<B256> {
        let raw = self
            .provider
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        let hash = Self::expect_string(raw, "transaction hash")?;
        hash.parse::<B256>()
            .map_err(|e| SignerError::BadResponse(format!("invalid transaction hash: {e}")))
    }

    async fn get_nonce(&self, block_tag: Option<&str>) -> SignerResult<u64> {
        let raw = self
            .provider
            .request(
                "eth_getTransactionCount",
                json!([self.address, block_tag.unwrap_or("latest")]),
            )
            .await?;
        transport::parse_quantity(&raw)
            .ok_or_else(|| SignerError::BadResponse(format!("invalid transaction count: {raw}")))
    }

    fn with_provider(&self, provider: SharedProvider) -> Arc<dyn WalletSigner> {
        Arc::new(Self {
            provider,
            address: self.address,
        })
    }
}
