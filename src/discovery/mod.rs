//! Wallet discovery subsystem.
//!
//! # Data Flow
//! ```text
//! announcement bus + injected slot
//!     → detectors.rs (brand predicates over provider flags)
//!     → engine.rs (standardized + legacy channels, eventually-consistent set)
//!     → dedup.rs (identity merge with configured wallet groups)
//! ```
//!
//! # Design Decisions
//! - Discovery never throws: absent providers and malformed announcements
//!   degrade to "fewer wallets found"
//! - The detected set is eventually consistent; consumers re-derive the
//!   deduplicated view whenever the snapshot reference changes

pub mod dedup;
pub mod detectors;
pub mod engine;

pub use dedup::{deduplicate, DeduplicationResult};
pub use detectors::{identify, WalletDetector, DETECTORS};
pub use engine::DiscoveryEngine;
