//! Warm-up signal.

use reqwest::Client;

use crate::client::FleetClient;
use crate::error::{FleetError, FleetResult};
use crate::protocol::headers::PROXY_ENSURE_REQUESTS;
use crate::protocol::ProxyStatus;
use crate::router::response::interpret_response;

impl FleetClient {
    /// Tell the fleet to prepare for `requests` upcoming concurrent
    /// requests, so it can scale up before the load arrives.
    ///
    /// Goes straight to the fleet entry address. Succeeds only if the fleet
    /// reports `Proxy-Status: 200`; any other status is returned as
    /// [`FleetError::EnsureRejected`].
    pub async fn ensure(&self, client: &Client, requests: u32) -> FleetResult<()> {
        self.ensure_alive()?;

        let entry = self.registry.entry().clone();
        if self.debug_enabled(2) {
            tracing::debug!(url = %entry, requests, "Sending ensure request");
        }

        let response = client
            .post(entry)
            .header(PROXY_ENSURE_REQUESTS, requests.to_string())
            .send()
            .await?;

        match interpret_response(&self.registry, response.headers())? {
            ProxyStatus::Passthrough => Ok(()),
            status => Err(FleetError::EnsureRejected(status.code())),
        }
    }
}
