//! Target selection.
//!
//! # Data Flow
//! ```text
//! registry (read lock)
//!     → one Candidate per known record, in index order
//!     → capacity.rs: pick_target
//!     → Some(index) → dispatch to that node
//!     → None        → registry resets, dispatch to the fleet entry address
//! ```
//!
//! # Design Decisions
//! - Selection is a pure function over a snapshot; it never locks or mutates
//! - Highest predicted free capacity wins, earliest index on ties
//! - The newest node is avoided while any older node has room, so an idle
//!   newest node can scale itself down

pub mod capacity;

pub use capacity::{pick_target, Candidate};
