//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic cycle
//!     → snapshot registry, pick records not heard from recently
//!     → probe.rs: probe each one concurrently, join all
//!     → responses fold into the registry like any dispatch response
//!     → no success at all: reset to and probe the fleet entry address
//!
//! Passive health checks (passive.rs):
//!     Connection failure observed during dispatch
//!     → mark the node unreachable
//! ```
//!
//! # Design Decisions
//! - No heartbeat service: freshness comes from dispatch traffic, probes
//!   only fill the gaps
//! - A dead node revives through any later accepted report
//! - Probe failures are never surfaced to callers

pub mod active;
pub mod passive;
pub mod probe;

pub use active::HealthMonitor;
pub use probe::Prober;
