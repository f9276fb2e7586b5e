//! Registry subsystem.
//!
//! # Data Flow
//! ```text
//! Response / probe headers
//!     → protocol::FleetReport
//!     → table.rs: should_replace_list? → apply_list_update (whole-table write lock)
//!     → pod.rs:   apply_stat_update (per-record check-lock-check)
//!
//! Dispatch:
//!     → table.rs: select (read lock, selector::pick_target)
//!     → pod.rs:   reserve (lock-free atomic decrement of predicted capacity)
//! ```
//!
//! # Design Decisions
//! - One lock guards the table structure, one lock per record guards its stats
//! - Predicted capacity is an atomic, adjusted without any lock
//! - Stale reports are dropped by the monotonic sequence rule, never merged
//! - Locks are never held across an await point

pub mod pod;
pub mod table;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use pod::{PodRecord, PodSnapshot, DEAD_SEQUENCE};
pub use table::{Registry, RegistrySnapshot, Target};

// Every critical section leaves the data consistent, so a poisoned lock is
// still safe to use.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
