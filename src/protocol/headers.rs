//! Header names exchanged between clients and fleet nodes.

use reqwest::header::HeaderName;

use crate::error::{FleetError, FleetResult};

/// Predicted remaining capacity of the responding node.
pub const PROXY_FREE: &str = "Proxy-Free";
/// Index of the responding node.
pub const PROXY_ORDINAL: &str = "Proxy-Ordinal";
/// Fleet-wide roster version.
pub const PROXY_VERSION: &str = "Proxy-Version";
/// Per-node monotonic sequence.
pub const PROXY_COUNTER: &str = "Proxy-Counter";
/// Backpressure / result status.
pub const PROXY_STATUS: &str = "Proxy-Status";
/// JSON object of index to address.
pub const PROXY_LIST: &str = "Proxy-List";

/// Final destination the node forwards to.
pub const PROXY_FORWARD_TO: &str = "Proxy-Forward-To";
/// Callback for late-failure notification.
pub const PROXY_WEBHOOK_CALLBACK: &str = "Proxy-Webhook-Callback";
/// Relaxed TLS propagation.
pub const PROXY_INSECURE_SKIP_VERIFY: &str = "Proxy-Insecure-Skip-Verify";
/// Declared upcoming burst size, sent to the fleet entry address only.
pub const PROXY_ENSURE_REQUESTS: &str = "Proxy-Ensure-Requests";

/// Headers removed from responses before they reach the caller.
/// `Proxy-Status` stays for the caller to inspect.
pub const INTERNAL_RESPONSE_HEADERS: [&str; 5] = [
    PROXY_FREE,
    PROXY_ORDINAL,
    PROXY_VERSION,
    PROXY_COUNTER,
    PROXY_LIST,
];

/// Convert one of the names above into a `HeaderName` for insertion.
pub fn header_name(name: &'static str) -> FleetResult<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| FleetError::protocol(name, e))
}
