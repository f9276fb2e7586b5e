//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe nodes that have gone quiet
//! - Fall back to the fleet entry address when nothing answers
//! - Exit cooperatively once the client is torn down

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time;

use crate::lifecycle::ShutdownSignal;
use crate::health::probe::Prober;
use crate::registry::{Registry, Target};

pub struct HealthMonitor {
    registry: Arc<Registry>,
    prober: Prober,
    interval: Duration,
    stale_after: Duration,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<Registry>,
        prober: Prober,
        interval: Duration,
        stale_after: Duration,
    ) -> Self {
        Self {
            registry,
            prober,
            interval,
            stale_after,
        }
    }

    /// Start the monitor as a background task.
    pub fn spawn(self, shutdown: ShutdownSignal) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: ShutdownSignal) {
        tracing::debug!(
            entry = %self.registry.entry(),
            interval_ms = self.interval.as_millis() as u64,
            "Health monitor starting"
        );

        loop {
            if shutdown.is_triggered() {
                break;
            }

            self.check_all().await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.wait() => break,
            }
        }

        tracing::debug!(entry = %self.registry.entry(), "Health monitor stopped");
    }

    /// Run one cycle. Returns the number of nodes that were fresh or
    /// answered their probe.
    pub async fn check_all(&self) -> usize {
        let mut successes = 0;
        let mut probes = JoinSet::new();

        for pod in self.registry.nodes() {
            if !pod.is_stale(self.stale_after) {
                successes += 1;
                continue;
            }

            let prober = self.prober.clone();
            let target = Target::Node {
                index: pod.index(),
                url: pod.url().clone(),
            };
            probes.spawn(async move { prober.probe(&target).await });
        }

        while let Some(result) = probes.join_next().await {
            match result {
                Ok(true) => successes += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "Probe task failed"),
            }
        }

        if successes == 0 {
            // Clears the table if every node is dead.
            if let target @ Target::Entry(_) = self.registry.select() {
                if self.prober.probe(&target).await {
                    successes += 1;
                }
            }
        }

        successes
    }
}
