//! Outbound request annotation.

use reqwest::header::HeaderValue;
use reqwest::Request;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{FleetError, FleetResult};
use crate::protocol::headers::{
    header_name, PROXY_FORWARD_TO, PROXY_INSECURE_SKIP_VERIFY, PROXY_WEBHOOK_CALLBACK,
};

/// Attach the fleet request headers. `destination` is where the node should
/// forward the request to, i.e. the caller's original URL.
pub fn annotate(request: &mut Request, destination: &Url, config: &ClientConfig) -> FleetResult<()> {
    set_header(request, PROXY_FORWARD_TO, destination.as_str())?;

    if let Some(callback) = config.webhook_callback.as_deref() {
        set_header(request, PROXY_WEBHOOK_CALLBACK, callback)?;
    }

    if config.insecure_skip_verify {
        set_header(request, PROXY_INSECURE_SKIP_VERIFY, "true")?;
    }

    Ok(())
}

/// Point the request at the chosen fleet address.
pub fn retarget(request: &mut Request, target: &Url) {
    *request.url_mut() = target.clone();
}

fn set_header(request: &mut Request, name: &'static str, value: &str) -> FleetResult<()> {
    let value = HeaderValue::from_str(value).map_err(|e| FleetError::protocol(name, e))?;
    request.headers_mut().insert(header_name(name)?, value);
    Ok(())
}
