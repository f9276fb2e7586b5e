//! The fleet client: registry, health monitor and configuration in one
//! handle.

use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{FleetError, FleetResult};
use crate::health::{HealthMonitor, Prober};
use crate::lifecycle::Shutdown;
use crate::registry::{Registry, RegistrySnapshot};
use crate::router::RetryPolicy;

/// Client-side view of a proxy fleet.
///
/// Built inside a Tokio runtime; the health monitor runs as a background
/// task until [`FleetClient::destroy`] is called or the client is dropped.
/// Share it between tasks behind an `Arc`.
#[derive(Debug)]
pub struct FleetClient {
    pub(crate) registry: Arc<Registry>,
    pub(crate) config: ClientConfig,
    pub(crate) retry: RetryPolicy,
    shutdown: Shutdown,
    monitor: Option<JoinHandle<()>>,
}

impl FleetClient {
    /// Client with default configuration for the fleet at `entry`, e.g.
    /// `http://proxy.default.svc.cluster.local`. The entry URL's scheme,
    /// port and path are reused for every node.
    pub fn new(entry: &str) -> FleetResult<Self> {
        Self::builder(entry).build()
    }

    pub fn builder(entry: &str) -> FleetClientBuilder {
        FleetClientBuilder::new(entry)
    }

    /// The fleet entry address.
    pub fn entry(&self) -> &Url {
        self.registry.entry()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Copy of the client's current view of the fleet.
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    /// Stop the health monitor. In-flight requests finish normally; later
    /// requests fail with [`FleetError::Destroyed`].
    pub fn destroy(&self) {
        if !self.shutdown.is_triggered() {
            tracing::debug!(entry = %self.entry(), "Destroying fleet client");
        }
        self.shutdown.trigger();
    }

    pub fn is_destroyed(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// True while the background health monitor task is alive.
    pub fn monitor_running(&self) -> bool {
        self.monitor.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub(crate) fn ensure_alive(&self) -> FleetResult<()> {
        if self.is_destroyed() {
            return Err(FleetError::Destroyed);
        }
        Ok(())
    }

    pub(crate) fn debug_enabled(&self, level: u8) -> bool {
        self.config.debug_enabled(level)
    }
}

impl Drop for FleetClient {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Builder for [`FleetClient`].
#[derive(Debug)]
pub struct FleetClientBuilder {
    entry: String,
    config: ClientConfig,
    probe_client: Option<reqwest::Client>,
    health_monitor: bool,
}

impl FleetClientBuilder {
    pub fn new(entry: &str) -> Self {
        Self {
            entry: entry.to_string(),
            config: ClientConfig::default(),
            probe_client: None,
            health_monitor: true,
        }
    }

    /// Use `config`; zero-valued options fall back to defaults.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// HTTP client used for health probes.
    pub fn probe_client(mut self, client: reqwest::Client) -> Self {
        self.probe_client = Some(client);
        self
    }

    /// Run the background health monitor (on by default).
    pub fn health_monitor(mut self, enabled: bool) -> Self {
        self.health_monitor = enabled;
        self
    }

    pub fn build(self) -> FleetResult<FleetClient> {
        let entry = parse_entry(&self.entry)?;
        let config = self.config.normalized();
        let registry = Arc::new(Registry::new(entry));
        let shutdown = Shutdown::new();

        let monitor = if self.health_monitor {
            tokio::runtime::Handle::try_current().map_err(|_| FleetError::NoRuntime)?;

            let prober = Prober::new(
                registry.clone(),
                self.probe_client.unwrap_or_default(),
                config.probe_timeout(),
                config.debug_level,
            );
            let monitor = HealthMonitor::new(
                registry.clone(),
                prober,
                config.probe_interval(),
                config.stale_after(),
            );
            Some(monitor.spawn(shutdown.subscribe()))
        } else {
            None
        };

        tracing::debug!(
            entry = %registry.entry(),
            senders = config.senders,
            max_attempts = config.max_attempts,
            health_monitor = monitor.is_some(),
            "Fleet client created"
        );

        Ok(FleetClient {
            registry,
            retry: RetryPolicy::new(config.max_attempts),
            config,
            shutdown,
            monitor,
        })
    }
}

fn parse_entry(entry: &str) -> FleetResult<Url> {
    let invalid = |reason: String| FleetError::InvalidEntryAddress {
        address: entry.to_string(),
        reason,
    };

    let url = Url::parse(entry).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}
