//! Adapter from the hub's minimal signer shape to the full surface a
//! transaction-construction library expects.
//!
//! # Responsibilities
//! - Population (from, nonce), gas estimation, call simulation
//! - Full send: native wallet send when available, otherwise a manual
//!   sign-then-broadcast bridge through the bound read-only provider
//!
//! # Design Decisions
//! - Capabilities are read once from the wrapped signer at construction
//! - A wallet that can only sign is still usable for sending: the adapter
//!   populates, signs, then broadcasts the signed payload itself

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, B256, U256, U64};
use serde_json::{json, Value};

use crate::provider::transport::{self, SharedProvider};
use crate::signer::factory::WalletSigner;
use crate::signer::types::{
    SignerCapabilities, SignerError, SignerProfile, SignerResult, TransactionRequest,
};

/// Wraps a [`WalletSigner`] plus an optional read-only provider.
#[derive(Clone)]
pub struct SignerAdapter {
    signer: Arc<dyn WalletSigner>,
    provider: Option<SharedProvider>,
    capabilities: SignerCapabilities,
}

impl SignerAdapter {
    /// Build an adapter. When no read provider is supplied, the signer's own
    /// bound provider is used for read operations and broadcasting.
    pub fn new(signer: Arc<dyn WalletSigner>, provider: Option<SharedProvider>) -> Self {
        let provider = provider.or_else(|| signer.provider());
        let capabilities = signer.capabilities();
        Self {
            signer,
            provider,
            capabilities,
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn capabilities(&self) -> SignerCapabilities {
        self.capabilities
    }

    pub fn profile(&self) -> SignerProfile {
        self.capabilities.profile()
    }

    /// New adapter bound to a replacement read provider; the wrapped signer
    /// and the original adapter are unchanged.
    pub fn with_provider(&self, provider: SharedProvider) -> Self {
        Self {
            signer: self.signer.clone(),
            provider: Some(provider),
            capabilities: self.capabilities,
        }
    }

    pub async fn sign_message(&self, message: &str) -> SignerResult<String> {
        self.signer.sign_message(message).await
    }

    pub async fn sign_transaction(&self, tx: &TransactionRequest) -> SignerResult<String> {
        if !self.capabilities.sign_transaction {
            return Err(SignerError::Unsupported("signTransaction"));
        }
        self.signer.sign_transaction(tx).await
    }

    /// Nonce resolution order: the signer's own capability, then the read
    /// provider's `eth_getTransactionCount`, then a hard error.
    pub async fn get_nonce(&self, block_tag: Option<&str>) -> SignerResult<u64> {
        if self.capabilities.nonce_lookup {
            return self.signer.get_nonce(block_tag).await;
        }

        let provider = self
            .provider
            .as_ref()
            .ok_or(SignerError::NoProvider { action: "get nonce" })?;
        let raw = provider
            .request(
                "eth_getTransactionCount",
                json!([self.signer.address(), block_tag.unwrap_or("latest")]),
            )
            .await?;
        transport::parse_quantity(&raw)
            .ok_or_else(|| SignerError::BadResponse(format!("invalid transaction count: {raw}")))
    }

    /// Fill `from` and `nonce` when absent. Gas fields are left to the
    /// wallet, which prices them itself.
    pub async fn populate_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> SignerResult<TransactionRequest> {
        let mut populated = tx.clone();
        if populated.from.is_none() {
            populated.from = Some(self.signer.address());
        }
        if populated.nonce.is_none() {
            populated.nonce = Some(U64::from(self.get_nonce(None).await?));
        }
        Ok(populated)
    }

    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> SignerResult<U256> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(SignerError::NoProvider { action: "estimate gas" })?;
        let raw = provider.request("eth_estimateGas", json!([tx])).await?;
        parse_u256(&raw)
            .ok_or_else(|| SignerError::BadResponse(format!("invalid gas estimate: {raw}")))
    }

    /// Simulate the transaction via `eth_call`, returning the hex-encoded
    /// return data.
    pub async fn call(&self, tx: &TransactionRequest) -> SignerResult<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(SignerError::NoProvider { action: "call" })?;
        let raw = provider.request("eth_call", json!([tx, "latest"])).await?;
        match raw {
            Value::String(data) => Ok(data),
            other => Err(SignerError::BadResponse(format!(
                "expected call data string, got {other}"
            ))),
        }
    }

    /// Injected transports expose no name-resolution surface, so this always
    /// resolves to nothing rather than guessing.
    pub async fn resolve_name(&self, name: &str) -> SignerResult<Option<Address>> {
        tracing::debug!(name, "Name resolution not available over injected transports");
        Ok(None)
    }

    /// Send a transaction.
    ///
    /// Wallets that can send natively do so. Wallets that can only sign get
    /// the bridge path: populate `from`/`nonce`, sign, then broadcast the
    /// signed payload through the read provider via `eth_sendRawTransaction`.
    pub async fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> SignerResult<PendingTransaction> {
        if self.capabilities.send_transaction {
            let hash = self.signer.send_transaction(tx).await?;
            return Ok(PendingTransaction::new(hash, self.provider.clone()));
        }

        if !self.capabilities.sign_transaction {
            return Err(SignerError::Unsupported("sendTransaction"));
        }
        let provider = self
            .provider
            .as_ref()
            .ok_or(SignerError::NoProvider { action: "broadcast transaction" })?;

        let populated = self.populate_transaction(tx).await?;
        let signed = self.signer.sign_transaction(&populated).await?;
        let raw = provider
            .request("eth_sendRawTransaction", json!([signed]))
            .await?;
        let hash = match raw {
            Value::String(hash) => hash
                .parse::<B256>()
                .map_err(|e| SignerError::BadResponse(format!("invalid transaction hash: {e}")))?,
            other => {
                return Err(SignerError::BadResponse(format!(
                    "expected transaction hash, got {other}"
                )))
            }
        };
        Ok(PendingTransaction::new(hash, Some(provider.clone())))
    }
}

impl fmt::Debug for SignerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerAdapter")
            .field("address", &self.signer.address())
            .field("capabilities", &self.capabilities)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

/// A broadcast transaction awaiting inclusion.
#[derive(Clone)]
pub struct PendingTransaction {
    pub hash: B256,
    provider: Option<SharedProvider>,
}

impl PendingTransaction {
    fn new(hash: B256, provider: Option<SharedProvider>) -> Self {
        Self { hash, provider }
    }

    /// Fetch the receipt once, `None` while still pending.
    pub async fn receipt(&self) -> SignerResult<Option<Value>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(SignerError::NoProvider { action: "fetch receipt" })?;
        let raw = provider
            .request("eth_getTransactionReceipt", json!([self.hash]))
            .await?;
        Ok(match raw {
            Value::Null => None,
            receipt => Some(receipt),
        })
    }
}

impl fmt::Debug for PendingTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

fn parse_u256(value: &Value) -> Option<U256> {
    match value {
        Value::String(s) => {
            let digits = s.strip_prefix("0x")?;
            U256::from_str_radix(digits, 16).ok()
        }
        Value::Number(n) => n.as_u64().map(U256::from),
        _ => None,
    }
}
