//! Provider transport boundary.
//!
//! # Data Flow
//! ```text
//! wallet extension / host environment
//!     → transport.rs (request boundary, brand flags, rpc helpers)
//!     → announce.rs (announce/request publish-subscribe channel)
//!     → injected.rs (legacy single-slot injection model)
//! ```
//!
//! # Design Decisions
//! - Provider objects are owned by the host environment; the hub only holds
//!   shared references and never wraps them in locks (wallet extensions
//!   serialize their own request queues)
//! - Provider round-trips carry no built-in timeout; callers that need one
//!   apply it themselves

pub mod announce;
pub mod injected;
pub mod transport;

pub use announce::{AnnouncementBus, ProviderAnnouncement, ProviderInfo};
pub use injected::InjectedProviders;
pub use transport::{BrandFlags, EthereumProvider, ProviderError, ProviderResult, SharedProvider};

#[cfg(test)]
pub(crate) mod testing;
