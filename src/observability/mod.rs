//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing, pretty format for development
//! - Metrics are cheap (atomic increments) and recorded unconditionally;
//!   without an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
