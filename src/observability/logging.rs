//! Structured logging setup for binaries embedding the client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "fleet_router=info";

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` wins over `level`; `level` wins over [`DEFAULT_FILTER`].
/// Returns false if a subscriber was already installed.
pub fn init_logging(level: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("fleet_router={}", level)),
        None => EnvFilter::new(DEFAULT_FILTER),
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
