//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / router / health monitor produce:
//!     → tracing events (gated by ClientConfig::debug_level where noisy)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → whatever tracing subscriber the application installs
//!       (logging.rs provides the one the CLI uses)
//!     → whatever metrics recorder the application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself
//! - Structured fields (index, address, version) rather than formatted text

pub mod logging;
pub mod metrics;
