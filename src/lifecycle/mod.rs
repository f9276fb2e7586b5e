//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! FleetClient::build
//!     → Shutdown::new, spawn health monitor with a ShutdownSignal
//!
//! FleetClient::destroy (or drop)
//!     → Shutdown::trigger
//!     → monitor observes the flag at the top of its next cycle and exits
//!     → in-flight dispatches finish normally; new ones fail with Destroyed
//! ```
//!
//! # Design Decisions
//! - Teardown is cooperative; nothing is aborted
//! - The flag is level-triggered so late checks never miss it

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
