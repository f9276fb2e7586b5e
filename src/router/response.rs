//! Response interpretation.

use reqwest::header::HeaderMap;
use reqwest::Response;

use crate::error::FleetResult;
use crate::protocol::headers::{INTERNAL_RESPONSE_HEADERS, PROXY_STATUS};
use crate::protocol::{FleetReport, ProxyStatus};
use crate::registry::Registry;

/// Parse the fleet report carried by `headers` and fold it into the
/// registry. Shared by dispatch, probes and ensure.
pub fn interpret_response(registry: &Registry, headers: &HeaderMap) -> FleetResult<ProxyStatus> {
    let report = FleetReport::from_headers(headers)?;
    registry.apply_report(&report);
    Ok(report.status)
}

/// Remove the report headers, keeping `Proxy-Status`.
pub fn strip_internal_headers(headers: &mut HeaderMap) {
    for name in INTERNAL_RESPONSE_HEADERS {
        headers.remove(name);
    }
}

/// The backpressure status of a response returned by the fleet client.
pub fn proxy_status(response: &Response) -> Option<ProxyStatus> {
    response
        .headers()
        .get(PROXY_STATUS)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u16>()
        .ok()
        .map(ProxyStatus::from)
}
