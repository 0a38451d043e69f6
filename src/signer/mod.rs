//! Signing capability layer.
//!
//! # Data Flow
//! ```text
//! connection orchestrator
//!     → factory.rs (ProviderSigner: every method one provider round-trip)
//!     → adapter.rs (full transaction-library surface over a WalletSigner)
//! ```
//!
//! # Design Decisions
//! - Signers are immutable value objects with respect to their bound
//!   provider: rebinding returns a new signer
//! - Capabilities are classified once at construction, never re-probed per
//!   call
//! - Capability gaps are descriptive errors, never silent `None`s, because
//!   downstream transaction flows treat them as hard failures

pub mod adapter;
pub mod factory;
pub mod types;

pub use adapter::{PendingTransaction, SignerAdapter};
pub use factory::{ProviderSigner, WalletSigner};
pub use types::{SignerCapabilities, SignerError, SignerProfile, SignerResult, TransactionRequest};
