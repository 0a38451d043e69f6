//! Chain switching over the wallet RPC surface.
//!
//! Wallets reject `wallet_switchEthereumChain` with code 4902 when they have
//! never seen the target chain. In that case the chain is registered with
//! `wallet_addEthereumChain` from the known-chain table and the switch is
//! retried once.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::observability::metrics;
use crate::provider::transport::{self, EthereumProvider, ProviderError};

/// Native currency descriptor as wallets expect it in add-chain params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A chain the application knows how to register with a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDefinition {
    pub id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_url: Option<String>,
}

impl ChainDefinition {
    /// The `wallet_addEthereumChain` parameter object.
    fn add_params(&self) -> Value {
        let mut params = json!({
            "chainId": transport::hex_quantity(self.id),
            "chainName": self.name,
            "nativeCurrency": self.native_currency,
            "rpcUrls": self.rpc_urls,
        });
        if let Some(explorer) = &self.block_explorer_url {
            params["blockExplorerUrls"] = json!([explorer]);
        }
        params
    }
}

/// Errors from a chain switch attempt.
#[derive(Debug, Error)]
pub enum ChainSwitchError {
    /// No wallet is connected to switch.
    #[error("cannot switch chain: no wallet connected")]
    NotConnected,

    /// The wallet does not recognize the chain and no definition exists to
    /// register it with.
    #[error("chain {0} is not known to the wallet and no definition is configured")]
    UnknownChain(u64),

    /// The wallet refused or the transport failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Switch the wallet to `chain_id`, registering it from `known` on a 4902
/// rejection. At most one add-then-retry cycle.
pub async fn switch_chain(
    provider: &dyn EthereumProvider,
    chain_id: u64,
    known: &[ChainDefinition],
) -> Result<(), ChainSwitchError> {
    let switch_params = json!([{ "chainId": transport::hex_quantity(chain_id) }]);

    match provider
        .request("wallet_switchEthereumChain", switch_params.clone())
        .await
    {
        Ok(_) => {
            tracing::info!(chain_id, "Switched chain");
            metrics::record_chain_switch("switched");
            Ok(())
        }
        Err(err) if err.code() == Some(ProviderError::UNRECOGNIZED_CHAIN) => {
            let definition = known
                .iter()
                .find(|chain| chain.id == chain_id)
                .ok_or(ChainSwitchError::UnknownChain(chain_id))?;

            tracing::info!(chain_id, chain = %definition.name, "Registering unrecognized chain");
            provider
                .request("wallet_addEthereumChain", json!([definition.add_params()]))
                .await?;
            provider
                .request("wallet_switchEthereumChain", switch_params)
                .await?;
            metrics::record_chain_switch("added");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(chain_id, error = %err, "Chain switch failed");
            metrics::record_chain_switch("failed");
            Err(err.into())
        }
    }
}
