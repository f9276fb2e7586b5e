//! Passive health checking (failure detection).
//!
//! # Responsibilities
//! - Classify dispatch failures
//! - Mark nodes unreachable on connection-class failures
//!
//! # Design Decisions
//! - Only connection errors (refused, connect timeout) count as node death
//! - Failures against the fleet entry address are never recorded: there is
//!   no record for it and nothing further to fall back to

use crate::registry::Registry;

/// True for failures that mean the node itself could not be reached.
pub fn is_connect_failure(err: &reqwest::Error) -> bool {
    err.is_connect()
}

/// Record a failed call to node `index`. Returns true if the failure is
/// connection-class, in which case the node, if still known, is now marked
/// unreachable.
pub fn record_failure(registry: &Registry, index: usize, err: &reqwest::Error) -> bool {
    if !is_connect_failure(err) {
        return false;
    }
    if registry.mark_unreachable(index) {
        tracing::debug!(index, error = %err, "Marked node unreachable");
    }
    true
}
