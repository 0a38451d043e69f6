//! Connect/disconnect capability bound to one wallet's provider.

use std::fmt;

use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

use crate::provider::transport::{self, ProviderError, SharedProvider};

/// Outcome of a connector's single `eth_requestAccounts` round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub accounts: Vec<Address>,
    pub chain_id: Option<u64>,
}

/// Errors a connector can surface.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The provider resolved the request but returned zero usable accounts.
    /// Treated as a connection failure, never a zero-account success.
    #[error("{wallet}: provider returned no accounts")]
    NoAccounts { wallet: String },

    #[error("{wallet}: {source}")]
    Provider {
        wallet: String,
        source: ProviderError,
    },
}

/// Capability object pairing a provider with connect/disconnect operations.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    fn provider(&self) -> SharedProvider;

    /// One external round-trip to the provider's `eth_requestAccounts`.
    async fn connect(&self) -> Result<ConnectOutcome, ConnectorError>;

    /// Best-effort: injected providers support no true programmatic
    /// disconnect, so the default implementation only logs.
    async fn disconnect(&self) {
        tracing::debug!("Injected providers require manual disconnect in the wallet UI");
    }
}

/// The standard connector used for every detected wallet without a custom
/// connector factory.
pub struct ProviderConnector {
    provider: SharedProvider,
    wallet_name: String,
}

impl ProviderConnector {
    pub fn new(provider: SharedProvider, wallet_name: &str) -> Self {
        Self {
            provider,
            wallet_name: wallet_name.to_string(),
        }
    }
}

impl fmt::Debug for ProviderConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConnector")
            .field("wallet_name", &self.wallet_name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletConnector for ProviderConnector {
    fn provider(&self) -> SharedProvider {
        self.provider.clone()
    }

    async fn connect(&self) -> Result<ConnectOutcome, ConnectorError> {
        tracing::debug!(wallet = %self.wallet_name, "Requesting accounts");

        let accounts = transport::request_accounts(self.provider.as_ref())
            .await
            .map_err(|source| ConnectorError::Provider {
                wallet: self.wallet_name.clone(),
                source,
            })?;

        if accounts.is_empty() {
            return Err(ConnectorError::NoAccounts {
                wallet: self.wallet_name.clone(),
            });
        }

        let chain_id = transport::chain_id(self.provider.as_ref()).await;

        tracing::info!(
            wallet = %self.wallet_name,
            account = %accounts[0],
            chain_id = ?chain_id,
            "Wallet connected"
        );

        Ok(ConnectOutcome { accounts, chain_id })
    }

    async fn disconnect(&self) {
        tracing::debug!(wallet = %self.wallet_name, "Disconnect is manual for injected wallets");
    }
}
