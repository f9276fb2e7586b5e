//! Error types for the fleet client.

use thiserror::Error;

/// Errors surfaced to callers of the fleet client.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The fleet entry address could not be parsed as an absolute URL.
    #[error("Invalid fleet entry address '{address}': {reason}")]
    InvalidEntryAddress { address: String, reason: String },

    /// A node address from the roster could not be turned into a URL.
    #[error("Invalid node address '{0}'")]
    InvalidNodeAddress(String),

    /// The outbound call failed at the transport level and was not retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A required protocol header was missing or malformed.
    #[error("Error parsing {header}: {reason}")]
    Protocol { header: &'static str, reason: String },

    /// The fleet answered a warm-up signal with something other than 200.
    #[error("Unexpected proxy status code {0}")]
    EnsureRejected(u16),

    /// The client was built outside a Tokio runtime.
    #[error("Fleet client requires a running Tokio runtime")]
    NoRuntime,

    /// The client has been torn down.
    #[error("Fleet client has been destroyed")]
    Destroyed,
}

impl FleetError {
    pub(crate) fn protocol(header: &'static str, reason: impl ToString) -> Self {
        FleetError::Protocol {
            header,
            reason: reason.to_string(),
        }
    }

    /// True for connection-class failures (refused, connect timeout).
    pub fn is_connect(&self) -> bool {
        matches!(self, FleetError::Transport(e) if e.is_connect())
    }
}

/// Result alias used across the crate.
pub type FleetResult<T> = Result<T, FleetError>;
