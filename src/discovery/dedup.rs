//! Deduplication engine.
//!
//! The same physical extension can surface once per discovery channel and a
//! third time in the application's configured wallet list, each time under a
//! different identifier scheme. This module merges the three views.
//!
//! # Design Decisions
//! - Standardized identities are authoritative: they replace legacy entries
//!   for the same name or reverse-domain identity, never vice versa
//! - Configured entries never override a live detection; they only fill
//!   gaps for wallets not actually present
//! - Pure function over its inputs, safe to re-run every time the detected
//!   set changes

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::observability::metrics;
use crate::wallet::types::{DetectedWallet, DetectionOrigin, ExtendedWallet};

/// Final presentation after the merge: surviving detections plus surviving
/// configured groups (empty groups are dropped entirely).
#[derive(Debug, Clone, Default)]
pub struct DeduplicationResult {
    pub filtered: Vec<DetectedWallet>,
    pub static_filtered: BTreeMap<String, Vec<ExtendedWallet>>,
}

impl DeduplicationResult {
    /// The detected set converted to one "installed" group alongside the
    /// surviving configured groups.
    pub fn unified_groups(&self, installed_group_name: &str) -> BTreeMap<String, Vec<ExtendedWallet>> {
        let mut groups = self.static_filtered.clone();
        if !self.filtered.is_empty() {
            groups.insert(
                installed_group_name.to_string(),
                self.filtered.iter().map(DetectedWallet::to_extended).collect(),
            );
        }
        groups
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Merge the detected set with the configured wallet groups.
pub fn deduplicate(
    detected: &[DetectedWallet],
    configured: &BTreeMap<String, Vec<ExtendedWallet>>,
) -> DeduplicationResult {
    let filtered = deduplicate_detected(detected);
    let static_filtered = filter_configured(configured, &filtered);
    DeduplicationResult {
        filtered,
        static_filtered,
    }
}

fn deduplicate_detected(detected: &[DetectedWallet]) -> Vec<DetectedWallet> {
    // Standardized entries first, stable otherwise, so the walk below sees
    // the authoritative identity before any legacy double.
    let mut sorted: Vec<DetectedWallet> = detected.to_vec();
    sorted.sort_by_key(|wallet| wallet.origin != DetectionOrigin::Standardized);

    let mut filtered: Vec<DetectedWallet> = Vec::with_capacity(sorted.len());
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut by_rdns: HashMap<String, usize> = HashMap::new();

    for wallet in sorted {
        let name_key = normalize(&wallet.name);
        let existing = by_name
            .get(&name_key)
            .or_else(|| by_rdns.get(&wallet.rdns))
            .copied();

        match existing {
            None => {
                let index = filtered.len();
                by_name.insert(name_key, index);
                by_rdns.insert(wallet.rdns.clone(), index);
                tracing::debug!(name = %wallet.name, rdns = %wallet.rdns, origin = %wallet.origin, "Keeping wallet");
                filtered.push(wallet);
            }
            Some(index)
                if wallet.origin == DetectionOrigin::Standardized
                    && filtered[index].origin != DetectionOrigin::Standardized =>
            {
                tracing::debug!(
                    replaced = %filtered[index].id,
                    with = %wallet.id,
                    "Upgrading to standardized identity"
                );
                metrics::record_dedup("replaced");
                by_name.insert(name_key, index);
                by_rdns.insert(wallet.rdns.clone(), index);
                filtered[index] = wallet;
            }
            Some(_) => {
                tracing::debug!(name = %wallet.name, rdns = %wallet.rdns, "Discarding duplicate");
                metrics::record_dedup("discarded");
            }
        }
    }

    filtered
}

fn filter_configured(
    configured: &BTreeMap<String, Vec<ExtendedWallet>>,
    detected: &[DetectedWallet],
) -> BTreeMap<String, Vec<ExtendedWallet>> {
    let detected_names: HashSet<String> = detected.iter().map(|w| normalize(&w.name)).collect();
    let detected_ids: HashSet<String> = detected.iter().map(|w| w.id.to_lowercase()).collect();

    let mut out = BTreeMap::new();
    for (group_name, wallets) in configured {
        let surviving: Vec<ExtendedWallet> = wallets
            .iter()
            .filter(|wallet| {
                let duplicate = detected_names.contains(&normalize(&wallet.name))
                    || detected_ids.contains(&wallet.id.to_lowercase());
                if duplicate {
                    tracing::debug!(
                        group = %group_name,
                        wallet = %wallet.name,
                        "Filtering configured wallet shadowed by a live detection"
                    );
                    metrics::record_dedup("configured_filtered");
                }
                !duplicate
            })
            .cloned()
            .collect();

        if !surviving.is_empty() {
            out.insert(group_name.clone(), surviving);
        }
    }
    out
}
