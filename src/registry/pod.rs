//! Per-node state record.
//!
//! # Responsibilities
//! - Hold one fleet node's address and pre-computed URL
//! - Track the node-reported sequence and the time of the last accepted report
//! - Track the client's predicted free capacity for the node

use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use serde::Serialize;
use url::Url;

use crate::error::{FleetError, FleetResult};
use crate::registry::{read, write};

/// Sequence value marking a node unreachable by this client.
pub const DEAD_SEQUENCE: i64 = -1;

#[derive(Debug, Default)]
struct PodStats {
    sequence: i64,
    last_updated: Option<Instant>,
}

/// A single fleet node as seen by this client.
#[derive(Debug)]
pub struct PodRecord {
    index: usize,
    address: String,
    url: Url,
    stats: RwLock<PodStats>,
    /// Predicted free capacity. May go negative.
    free: AtomicI64,
}

/// Point-in-time view of a record, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodSnapshot {
    pub index: usize,
    pub address: String,
    pub sequence: i64,
    pub free: i64,
    /// Milliseconds since the last accepted report, `None` if never updated.
    pub age_ms: Option<u64>,
}

impl PodRecord {
    /// Create a zero-valued record. The node URL takes scheme, port and path
    /// from the fleet entry URL unless `address` carries its own port.
    pub fn new(index: usize, address: &str, entry: &Url) -> FleetResult<Self> {
        Ok(Self {
            index,
            address: address.to_string(),
            url: node_url(entry, address)?,
            stats: RwLock::new(PodStats::default()),
            free: AtomicI64::new(0),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn sequence(&self) -> i64 {
        read(&self.stats).sequence
    }

    pub fn free(&self) -> i64 {
        self.free.load(Ordering::Relaxed)
    }

    pub fn is_alive(&self) -> bool {
        self.sequence() >= 0
    }

    pub fn last_updated(&self) -> Option<Instant> {
        read(&self.stats).last_updated
    }

    /// True if no report was accepted within `max_age`.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        match self.last_updated() {
            Some(at) => at.elapsed() > max_age,
            None => true,
        }
    }

    /// Apply a node report. Accepted only if `sequence` is strictly greater
    /// than the stored one; returns whether it was accepted.
    pub fn apply_stat_update(&self, sequence: i64, free: i64) -> bool {
        if sequence <= self.sequence() {
            return false;
        }

        let mut stats = write(&self.stats);

        // Another report may have landed while we waited for the lock.
        if sequence <= stats.sequence {
            return false;
        }

        stats.sequence = sequence;
        stats.last_updated = Some(Instant::now());
        self.free.store(free, Ordering::Relaxed);
        true
    }

    /// Mark the node unreachable. Capacity and freshness are left alone.
    pub fn mark_unreachable(&self) {
        write(&self.stats).sequence = DEAD_SEQUENCE;
    }

    /// Optimistically subtract `amount` from the predicted free capacity.
    pub fn reserve(&self, amount: i64) {
        self.free.fetch_sub(amount, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PodSnapshot {
        let stats = read(&self.stats);
        PodSnapshot {
            index: self.index,
            address: self.address.clone(),
            sequence: stats.sequence,
            free: self.free(),
            age_ms: stats
                .last_updated
                .map(|at| at.elapsed().as_millis().min(u64::MAX as u128) as u64),
        }
    }
}

/// Build a node URL from the fleet entry URL and a roster address.
///
/// Accepted address forms: `10.0.0.4`, `fd00::4`, `10.0.0.4:8080`,
/// `[fd00::4]:8080`, `proxy-3.proxy` and `proxy-3.proxy:8080`.
pub fn node_url(entry: &Url, address: &str) -> FleetResult<Url> {
    let invalid = || FleetError::InvalidNodeAddress(address.to_string());

    let mut url = entry.clone();
    url.set_query(None);
    url.set_fragment(None);

    if let Ok(ip) = address.parse::<IpAddr>() {
        url.set_ip_host(ip).map_err(|_| invalid())?;
    } else if let Ok(socket) = address.parse::<SocketAddr>() {
        url.set_ip_host(socket.ip()).map_err(|_| invalid())?;
        url.set_port(Some(socket.port())).map_err(|_| invalid())?;
    } else if let Some((host, port)) = address
        .rsplit_once(':')
        .and_then(|(h, p)| p.parse::<u16>().ok().map(|p| (h, p)))
    {
        url.set_host(Some(host)).map_err(|_| invalid())?;
        url.set_port(Some(port)).map_err(|_| invalid())?;
    } else {
        url.set_host(Some(address)).map_err(|_| invalid())?;
    }

    Ok(url)
}
