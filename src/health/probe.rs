//! Single-node probe.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::observability::metrics;
use crate::registry::{Registry, Target};
use crate::router::response::interpret_response;

/// Issues lightweight requests to fleet nodes and folds the answers into
/// the registry.
#[derive(Debug, Clone)]
pub struct Prober {
    registry: Arc<Registry>,
    client: Client,
    timeout: Option<Duration>,
    debug_level: u8,
}

impl Prober {
    pub fn new(
        registry: Arc<Registry>,
        client: Client,
        timeout: Option<Duration>,
        debug_level: u8,
    ) -> Self {
        Self {
            registry,
            client,
            timeout,
            debug_level,
        }
    }

    /// Probe `target`. Returns true if the target answered with a valid
    /// fleet report.
    ///
    /// A node that cannot be reached is marked unreachable. A node that
    /// answers with an unparseable report is left alone but does not count
    /// as a success.
    pub async fn probe(&self, target: &Target) -> bool {
        if self.debug_level >= 2 {
            tracing::debug!(index = ?target.index(), url = %target.url(), "Probing");
        }

        let mut request = self.client.get(target.url().clone());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let success = match request.send().await {
            Ok(response) => match interpret_response(&self.registry, response.headers()) {
                Ok(_) => true,
                Err(e) => {
                    if self.debug_level >= 1 {
                        tracing::debug!(index = ?target.index(), error = %e, "Probe returned an invalid report");
                    }
                    false
                }
            },
            Err(e) => {
                if let Some(index) = target.index() {
                    self.registry.mark_unreachable(index);
                }
                if self.debug_level >= 1 {
                    tracing::debug!(
                        index = ?target.index(),
                        url = %target.url(),
                        error = %e,
                        "Failed to probe"
                    );
                }
                false
            }
        };

        metrics::record_probe(success);
        success
    }
}
