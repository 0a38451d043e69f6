//! Connection layer: resolution, orchestration, session state, and chain
//! switching.
//!
//! # Data Flow
//! ```text
//! host application
//!     → context.rs (WalletContext: state snapshot + session persistence)
//!     → orchestrator.rs (resolve id → connect → signer)
//!     → chains.rs (wallet_switchEthereumChain with 4902 recovery)
//! ```

pub mod chains;
pub mod context;
pub mod orchestrator;

pub use chains::{ChainDefinition, ChainSwitchError, NativeCurrency};
pub use context::{
    MemorySessionStore, SessionStore, StoredSession, WalletContext, WalletState,
};
pub use orchestrator::{
    ConnectError, ConnectPhase, ConnectionOrchestrator, WalletConnectionResult,
};
