//! Versioned node table.
//!
//! # Responsibilities
//! - Own the fleet entry URL and the current node roster
//! - Replace the roster when a strictly newer list version is reported, or
//!   reseed an emptied table at its current version
//! - Route per-node reports to their record
//! - Choose a dispatch target and reset to the entry URL when every node is dead

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use url::Url;

use crate::observability::metrics;
use crate::protocol::{FleetReport, NodeList};
use crate::registry::pod::{PodRecord, PodSnapshot};
use crate::registry::{read, write};
use crate::selector::{self, Candidate};

/// Where a request should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A specific, believed-healthy fleet node.
    Node { index: usize, url: Url },
    /// The fleet entry address; no node data is usable.
    Entry(Url),
}

impl Target {
    pub fn url(&self) -> &Url {
        match self {
            Target::Node { url, .. } | Target::Entry(url) => url,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Target::Node { index, .. } => Some(*index),
            Target::Entry(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    version: i64,
    nodes: BTreeMap<usize, Arc<PodRecord>>,
    highest_index: usize,
}

impl Table {
    // The version never moves backwards. An emptied table also takes the
    // roster it last saw, so the entry address can reseed it.
    fn accepts(&self, version: i64) -> bool {
        version > self.version || (self.nodes.is_empty() && version == self.version)
    }
}

/// Point-in-time view of the registry, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub entry: String,
    pub version: i64,
    pub highest_index: usize,
    pub nodes: Vec<PodSnapshot>,
}

/// Shared view of the fleet, mutated concurrently by dispatch and the
/// health monitor.
#[derive(Debug)]
pub struct Registry {
    entry: Url,
    table: RwLock<Table>,
}

impl Registry {
    /// Create an empty registry at list version 0.
    pub fn new(entry: Url) -> Self {
        Self {
            entry,
            table: RwLock::new(Table::default()),
        }
    }

    pub fn entry(&self) -> &Url {
        &self.entry
    }

    pub fn version(&self) -> i64 {
        read(&self.table).version
    }

    pub fn highest_index(&self) -> usize {
        read(&self.table).highest_index
    }

    pub fn len(&self) -> usize {
        read(&self.table).nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.table).nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Arc<PodRecord>> {
        read(&self.table).nodes.get(&index).cloned()
    }

    /// All records, in index order.
    pub fn nodes(&self) -> Vec<Arc<PodRecord>> {
        read(&self.table).nodes.values().cloned().collect()
    }

    /// True if `version` is acceptable and the roster actually differs.
    pub fn should_replace_list(&self, list: &NodeList, version: i64) -> bool {
        let table = read(&self.table);
        if !table.accepts(version) {
            return false;
        }
        if table.nodes.len() != list.len() {
            return true;
        }
        list.iter().any(|(index, address)| match table.nodes.get(&index) {
            Some(pod) => pod.address() != address,
            None => true,
        })
    }

    /// Replace the roster if `version` is strictly newer, or equal to ours
    /// while the table is empty after a reset. Records whose index and
    /// address are unchanged keep their stats; everything else starts
    /// zero-valued. Returns whether the roster was replaced.
    pub fn apply_list_update(&self, list: &NodeList, version: i64) -> bool {
        let mut table = write(&self.table);
        if !table.accepts(version) {
            return false;
        }

        let mut nodes = BTreeMap::new();
        for (index, address) in list.iter() {
            if let Some(pod) = table.nodes.get(&index) {
                if pod.address() == address {
                    nodes.insert(index, pod.clone());
                    continue;
                }
            }

            match PodRecord::new(index, address, &self.entry) {
                Ok(pod) => {
                    nodes.insert(index, Arc::new(pod));
                }
                Err(e) => {
                    tracing::warn!(index, address, error = %e, "Ignoring invalid node address");
                }
            }
        }

        table.nodes = nodes;
        table.version = version;
        table.highest_index = list.highest_index();

        tracing::debug!(
            version,
            nodes = table.nodes.len(),
            highest_index = table.highest_index,
            "Node list replaced"
        );
        metrics::record_roster(version, table.nodes.len());
        true
    }

    /// Apply a node's own report to its record. Unknown indices and stale
    /// sequences are ignored.
    pub fn apply_stat_update(&self, index: usize, sequence: i64, free: i64) -> bool {
        match self.get(index) {
            Some(pod) => pod.apply_stat_update(sequence, free),
            None => false,
        }
    }

    /// Mark a node unreachable. Returns false if the index is unknown.
    pub fn mark_unreachable(&self, index: usize) -> bool {
        match self.get(index) {
            Some(pod) => {
                pod.mark_unreachable();
                metrics::record_node_dead();
                true
            }
            None => false,
        }
    }

    /// Fold a full fleet report into the registry: roster first, then the
    /// responding node's stats.
    pub fn apply_report(&self, report: &FleetReport) {
        if self.should_replace_list(&report.list, report.version) {
            self.apply_list_update(&report.list, report.version);
        }
        self.apply_stat_update(report.ordinal, report.counter, report.free);
    }

    /// Pick a dispatch target. When nodes are known but none is eligible,
    /// the node list is cleared (the list version is kept) and the entry URL
    /// returned.
    pub fn select(&self) -> Target {
        self.select_record().0
    }

    /// Like [`Registry::select`], but also hands back the chosen record so
    /// callers act on the same record the target URL came from.
    fn select_record(&self) -> (Target, Option<Arc<PodRecord>>) {
        {
            let table = read(&self.table);
            if table.nodes.is_empty() {
                return (Target::Entry(self.entry.clone()), None);
            }
            if let Some(pod) = Self::pick(&table) {
                return (Self::node_target(&pod), Some(pod));
            }
        }

        let mut table = write(&self.table);

        // A newer roster may have arrived while we waited for the lock.
        if let Some(pod) = Self::pick(&table) {
            return (Self::node_target(&pod), Some(pod));
        }

        if !table.nodes.is_empty() {
            tracing::debug!(version = table.version, "All nodes dead, clearing node list");
            table.nodes.clear();
            table.highest_index = 0;
            metrics::record_reset();
        }
        (Target::Entry(self.entry.clone()), None)
    }

    /// Select a target and, for a concrete node, subtract `reservation` from
    /// its predicted free capacity.
    pub fn select_and_reserve(&self, reservation: i64) -> Target {
        let (target, pod) = self.select_record();
        if let Some(pod) = pod {
            pod.reserve(reservation);
        }
        target
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let table = read(&self.table);
        RegistrySnapshot {
            entry: self.entry.to_string(),
            version: table.version,
            highest_index: table.highest_index,
            nodes: table.nodes.values().map(|pod| pod.snapshot()).collect(),
        }
    }

    fn pick(table: &Table) -> Option<Arc<PodRecord>> {
        let candidates = table.nodes.values().map(|pod| Candidate {
            index: pod.index(),
            free: pod.free(),
            alive: pod.is_alive(),
        });
        let index = selector::pick_target(candidates, table.highest_index)?;
        table.nodes.get(&index).cloned()
    }

    fn node_target(pod: &PodRecord) -> Target {
        Target::Node {
            index: pod.index(),
            url: pod.url().clone(),
        }
    }
}
