//! Client-side metrics.
//!
//! # Metrics
//! - `fleet_dispatch_total` (counter): dispatches by outcome
//! - `fleet_dispatch_retries_total` (counter): retries after a dead node
//! - `fleet_nodes_marked_dead_total` (counter)
//! - `fleet_probe_total` (counter): health probes by outcome
//! - `fleet_registry_resets_total` (counter): full resets to the entry address
//! - `fleet_known_nodes` (gauge): nodes in the current roster
//! - `fleet_list_version` (gauge): current roster version
//!
//! # Design Decisions
//! - Only the `metrics` facade is used; the embedding application installs
//!   an exporter if it wants one
//! - Outcome labels are static strings

use metrics::{counter, gauge};

/// Record a finished dispatch.
pub fn record_dispatch(outcome: &'static str) {
    counter!("fleet_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_retry() {
    counter!("fleet_dispatch_retries_total").increment(1);
}

pub fn record_node_dead() {
    counter!("fleet_nodes_marked_dead_total").increment(1);
}

pub fn record_probe(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("fleet_probe_total", "outcome" => outcome).increment(1);
}

/// Record a roster replacement.
pub fn record_roster(version: i64, nodes: usize) {
    gauge!("fleet_list_version").set(version as f64);
    gauge!("fleet_known_nodes").set(nodes as f64);
}

/// Record a full reset of the node table.
pub fn record_reset() {
    counter!("fleet_registry_resets_total").increment(1);
    record_roster(0, 0);
}
