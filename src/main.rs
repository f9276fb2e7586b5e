//! fleet-router command line.
//!
//! ```text
//! fleet-router --entry http://proxy.default.svc ensure 20
//! fleet-router --entry http://proxy.default.svc inspect
//! fleet-router --entry http://proxy.default.svc send http://recipient.default.svc --count 100
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use reqwest::Method;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use fleet_router::config::{load_config, ClientConfig};
use fleet_router::observability::logging::init_logging;
use fleet_router::router::proxy_status;
use fleet_router::FleetClient;

#[derive(Parser)]
#[command(name = "fleet-router")]
#[command(about = "Route requests through a self-scaling proxy fleet", long_about = None)]
struct Cli {
    /// Fleet entry address.
    #[arg(short, long, default_value = "http://localhost:8080")]
    entry: String,

    /// Client configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for fleet_router events, overridden by RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the fleet to scale for an upcoming burst
    Ensure {
        /// Number of concurrent requests to prepare for.
        requests: u32,
    },
    /// Learn the fleet roster and print the client's view of it
    Inspect {
        /// How long to let the health monitor gather reports.
        #[arg(long, default_value_t = 2500)]
        wait_ms: u64,
    },
    /// Drive requests to a destination through the fleet
    Send {
        /// Final destination of every request.
        url: String,

        #[arg(long, default_value = "GET")]
        method: Method,

        /// Requests kept in flight at once.
        #[arg(long, default_value_t = 20)]
        concurrency: usize,

        /// Total requests to send.
        #[arg(long, default_value_t = 100)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    let fleet = Arc::new(FleetClient::builder(&cli.entry).config(config).build()?);
    let http = reqwest::Client::new();

    match cli.command {
        Commands::Ensure { requests } => {
            fleet.ensure(&http, requests).await?;
            println!("Fleet accepted ensure for {} requests", requests);
        }
        Commands::Inspect { wait_ms } => {
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            println!("{}", serde_json::to_string_pretty(&fleet.snapshot())?);
        }
        Commands::Send {
            url,
            method,
            concurrency,
            count,
        } => {
            send(fleet.clone(), http, method, &url, concurrency.max(1), count).await?;
        }
    }

    fleet.destroy();
    Ok(())
}

async fn send(
    fleet: Arc<FleetClient>,
    http: reqwest::Client,
    method: Method,
    url: &str,
    concurrency: usize,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();
    let start = Instant::now();

    for _ in 0..count {
        let permit = permits.clone().acquire_owned().await?;
        let request = http.request(method.clone(), url).build()?;
        let fleet = fleet.clone();
        let http = http.clone();

        tasks.spawn(async move {
            let _permit = permit;
            match fleet.send(&http, request).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let proxy = proxy_status(&response).map(|s| s.code());
                    println!("{} (Proxy-Status {:?})", status, proxy);
                    proxy.map(|code| code.to_string()).unwrap_or_else(|| status.to_string())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    "error".to_string()
                }
            }
        });
    }

    let mut summary: BTreeMap<String, usize> = BTreeMap::new();
    while let Some(result) = tasks.join_next().await {
        *summary.entry(result?).or_default() += 1;
    }

    println!("Sent {} requests in {:?}", count, start.elapsed());
    for (outcome, n) in summary {
        println!("  {}: {}", outcome, n);
    }
    Ok(())
}
