//! Retry policy for dispatch.
//!
//! # Design Decisions
//! - Bounded by total attempts, the first one included
//! - Only connection failures against a concrete node are retryable
//! - A request whose body cannot be cloned gets a single attempt

use crate::health::passive::is_connect_failure;
use crate::registry::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// True if another attempt may follow attempt number `attempt`.
    pub fn has_budget(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// True if the failure of `attempt` against `target` should be retried.
    pub fn should_retry(&self, attempt: u32, target: &Target, err: &reqwest::Error) -> bool {
        self.has_budget(attempt) && target.index().is_some() && is_connect_failure(err)
    }
}
