//! Signer-layer types and error definitions.

use alloy::primitives::{Address, Bytes, U256, U64};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::transport::ProviderError;

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The wallet does not expose the required capability.
    #[error("{0} not supported by this wallet")]
    Unsupported(&'static str),

    /// The operation needs a bound provider and none is available.
    #[error("cannot {action}: no provider available")]
    NoProvider { action: &'static str },

    /// The underlying provider round-trip failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered with a shape the signer cannot decode.
    #[error("malformed signer response: {0}")]
    BadResponse(String),
}

/// Result type for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;

/// What a signer can do beyond address retrieval and message signing.
/// Classified once at construction; call sites consult this instead of
/// probing per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerCapabilities {
    pub sign_transaction: bool,
    pub send_transaction: bool,
    pub nonce_lookup: bool,
}

impl SignerCapabilities {
    pub const MINIMAL: Self = Self {
        sign_transaction: false,
        send_transaction: false,
        nonce_lookup: false,
    };

    pub const FULL: Self = Self {
        sign_transaction: true,
        send_transaction: true,
        nonce_lookup: true,
    };

    pub fn profile(&self) -> SignerProfile {
        if *self == Self::FULL {
            SignerProfile::Full
        } else {
            SignerProfile::Minimal
        }
    }
}

/// Coarse signer classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerProfile {
    /// Address retrieval and message signing only.
    Minimal,
    /// All transaction capabilities present.
    Full,
}

/// Transaction request in the wire shape wallet RPC methods expect:
/// camelCase keys, hex quantities, absent fields omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U64>,
}
