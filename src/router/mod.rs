//! Request routing through the fleet.
//!
//! # Data Flow
//! ```text
//! FleetClient::send(client, request)
//!     → annotate.rs (Proxy-Forward-To, webhook, TLS passthrough)
//!     → registry.select_and_reserve (selector + optimistic decrement)
//!     → rewrite URL to node / entry address, execute
//!     → connection failure on a node: health::passive marks it dead
//!         → retry.rs decides whether another attempt is allowed
//!     → success: response.rs interprets the report, updates the registry,
//!       strips internal headers (Proxy-Status stays)
//!
//! FleetClient::ensure(client, n)
//!     → ensure.rs: POST to the entry address with Proxy-Ensure-Requests
//!     → response.rs interprets the report; anything but 200 is an error
//! ```
//!
//! # Design Decisions
//! - Only connection-class failures against a concrete node are retried
//! - A malformed report is fatal for the call, never retried
//! - Retries are immediate; the next attempt already goes to another node

pub mod annotate;
pub mod dispatch;
pub mod ensure;
pub mod response;
pub mod retry;

pub use response::proxy_status;
pub use retry::RetryPolicy;
