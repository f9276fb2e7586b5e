//! Client-side routing for a self-scaling proxy fleet.
//!
//! A fleet of interchangeable proxy nodes absorbs backpressure between a
//! high-throughput sender and a slow receiver. Every node response carries
//! the fleet's own view of itself (capacity, roster, versions); this crate
//! consumes that view to route each request to the best node without a
//! load balancer, and probes quiet nodes in the background to notice when
//! the fleet shrinks.
//!
//! ```no_run
//! # async fn run() -> fleet_router::FleetResult<()> {
//! let fleet = fleet_router::FleetClient::new("http://proxy.default.svc.cluster.local")?;
//! let http = reqwest::Client::new();
//!
//! let request = http.get("http://recipient.default.svc.cluster.local").build()?;
//! let response = fleet.send(&http, request).await?;
//! println!("{:?}", fleet_router::router::proxy_status(&response));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod registry;
pub mod router;
pub mod selector;

pub use client::{FleetClient, FleetClientBuilder};
pub use config::ClientConfig;
pub use error::{FleetError, FleetResult};
pub use protocol::{FleetReport, NodeList, ProxyStatus};
pub use registry::{RegistrySnapshot, Target};
