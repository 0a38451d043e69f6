//! Metrics recording helpers.
//!
//! Thin wrappers over the `metrics` facade so call sites stay one line and
//! metric names live in one place. Without an installed recorder every call
//! is a no-op.

use metrics::counter;

use crate::wallet::types::DetectionOrigin;

/// A wallet entered the detected set.
pub fn record_wallet_detected(origin: DetectionOrigin) {
    counter!("wallet_hub_wallets_detected_total", "origin" => origin.to_string()).increment(1);
}

/// A standardized announcement was discarded as malformed.
pub fn record_announcement_discarded() {
    counter!("wallet_hub_announcements_discarded_total").increment(1);
}

/// A deduplication decision: "replaced", "discarded", or
/// "configured_filtered".
pub fn record_dedup(outcome: &str) {
    counter!("wallet_hub_dedup_total", "outcome" => outcome.to_string()).increment(1);
}

/// A connection attempt finished.
pub fn record_connect_attempt(wallet_id: &str, success: bool) {
    counter!(
        "wallet_hub_connect_attempts_total",
        "wallet" => wallet_id.to_string(),
        "outcome" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// A chain switch finished: "switched", "added", or "failed".
pub fn record_chain_switch(outcome: &'static str) {
    counter!("wallet_hub_chain_switches_total", "outcome" => outcome).increment(1);
}
