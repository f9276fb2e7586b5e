//! Configuration schema definitions.
//!
//! All types derive Serde traits so a client configuration can live in a
//! TOML file. Zero-valued options fall back to their defaults rather than
//! disabling the feature; see [`ClientConfig::normalized`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a fleet client.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Number of client instances sending through the fleet, this one
    /// included. Each dispatch subtracts this from the chosen node's
    /// predicted free capacity.
    pub senders: u32,

    /// Upper bound of attempts per dispatch.
    pub max_attempts: u32,

    /// Webhook the fleet calls when a request fails after the node has
    /// already answered 202.
    pub webhook_callback: Option<String>,

    /// Ask fleet nodes to skip TLS verification towards the destination.
    /// Set this when the caller's own transport skips verification.
    pub insecure_skip_verify: bool,

    /// Time between health monitor cycles in milliseconds.
    pub probe_interval_ms: u64,

    /// A node not heard from for this long is probed, in milliseconds.
    pub stale_after_ms: u64,

    /// Per-probe timeout in milliseconds. 0 leaves it to the probe client.
    pub probe_timeout_ms: u64,

    /// Verbosity of the client's own debug events (0 = off, 3 = all).
    pub debug_level: u8,
}

impl ClientConfig {
    pub const DEFAULT_SENDERS: u32 = 1;
    pub const DEFAULT_MAX_ATTEMPTS: u32 = u32::MAX;
    pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 1000;
    pub const DEFAULT_STALE_AFTER_MS: u64 = 1000;

    /// Replace zero-valued options with their defaults.
    pub fn normalized(mut self) -> Self {
        if self.senders == 0 {
            self.senders = Self::DEFAULT_SENDERS;
        }
        if self.max_attempts == 0 {
            self.max_attempts = Self::DEFAULT_MAX_ATTEMPTS;
        }
        if self.probe_interval_ms == 0 {
            self.probe_interval_ms = Self::DEFAULT_PROBE_INTERVAL_MS;
        }
        if self.stale_after_ms == 0 {
            self.stale_after_ms = Self::DEFAULT_STALE_AFTER_MS;
        }
        if matches!(self.webhook_callback.as_deref(), Some("")) {
            self.webhook_callback = None;
        }
        self
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        (self.probe_timeout_ms > 0).then(|| Duration::from_millis(self.probe_timeout_ms))
    }

    /// True if events of `level` should be emitted.
    pub fn debug_enabled(&self, level: u8) -> bool {
        level <= self.debug_level
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            senders: Self::DEFAULT_SENDERS,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            webhook_callback: None,
            insecure_skip_verify: false,
            probe_interval_ms: Self::DEFAULT_PROBE_INTERVAL_MS,
            stale_after_ms: Self::DEFAULT_STALE_AFTER_MS,
            probe_timeout_ms: 0,
            debug_level: 0,
        }
    }
}
