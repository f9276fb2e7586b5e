//! Per-request dispatch through the fleet.

use reqwest::{Client, Request, Response};

use crate::client::FleetClient;
use crate::error::FleetResult;
use crate::health::passive;
use crate::observability::metrics;
use crate::router::annotate::{annotate, retarget};
use crate::router::response::{interpret_response, strip_internal_headers};

impl FleetClient {
    /// Send `request` through the fleet.
    ///
    /// The request's own URL is the final destination; it travels in
    /// `Proxy-Forward-To` while the request itself goes to the best known
    /// fleet node, or to the fleet entry address when none is known.
    ///
    /// Connection failures against a node mark it dead and retry against
    /// another one, up to `max_attempts`. A request whose body cannot be
    /// cloned is attempted once. The returned response has the internal
    /// fleet headers removed, except `Proxy-Status`.
    pub async fn send(&self, client: &Client, mut request: Request) -> FleetResult<Response> {
        self.ensure_alive()?;

        let destination = request.url().clone();
        annotate(&mut request, &destination, &self.config)?;
        let reservation = i64::from(self.config.senders);

        let mut attempt: u32 = 1;
        loop {
            let target = self.registry.select_and_reserve(reservation);
            if self.debug_enabled(3) {
                tracing::debug!(
                    attempt,
                    index = ?target.index(),
                    url = %target.url(),
                    destination = %destination,
                    "Sending request"
                );
            }

            let next = if self.retry.has_budget(attempt) {
                request.try_clone()
            } else {
                None
            };

            retarget(&mut request, target.url());
            let err = match client.execute(request).await {
                Ok(response) => return self.accept(response),
                Err(err) => err,
            };

            if let Some(index) = target.index() {
                passive::record_failure(&self.registry, index, &err);
            }

            match next {
                Some(copy) if self.retry.should_retry(attempt, &target, &err) => {
                    if self.debug_enabled(1) {
                        tracing::debug!(attempt, index = ?target.index(), error = %err, "Retrying on another node");
                    }
                    metrics::record_retry();
                    request = copy;
                    attempt += 1;
                }
                _ => {
                    metrics::record_dispatch("transport_error");
                    return Err(err.into());
                }
            }
        }
    }

    fn accept(&self, mut response: Response) -> FleetResult<Response> {
        match interpret_response(&self.registry, response.headers()) {
            Ok(status) => {
                strip_internal_headers(response.headers_mut());
                metrics::record_dispatch(outcome(status.code()));
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(url = %response.url(), error = %e, "Fleet node sent an invalid report");
                metrics::record_dispatch("protocol_error");
                Err(e)
            }
        }
    }
}

fn outcome(status: u16) -> &'static str {
    match status {
        200 => "passthrough",
        202 => "accepted",
        429 => "rejected",
        _ => "other",
    }
}
