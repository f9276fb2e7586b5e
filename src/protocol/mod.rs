//! Fleet wire protocol.
//!
//! # Data Flow
//! ```text
//! Outbound request:
//!     router annotates with Proxy-Forward-To / Proxy-Webhook-Callback
//!     / Proxy-Insecure-Skip-Verify (or Proxy-Ensure-Requests for warm-up)
//!
//! Node response:
//!     Proxy-Free, Proxy-Ordinal, Proxy-Version, Proxy-Counter,
//!     Proxy-Status, Proxy-List
//!     → report.rs (FleetReport::from_headers)
//!     → registry update
//! ```
//!
//! # Design Decisions
//! - Header names are part of the compatibility surface and never change
//! - Every response header is required; a missing one is a protocol error
//! - Emission lives next to parsing so fleet nodes and tests share it

pub mod headers;
pub mod report;

pub use report::{FleetReport, NodeList, ProxyStatus};
