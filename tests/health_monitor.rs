//! Background probing of quiet nodes.

use std::sync::Arc;
use std::time::Duration;

use fleet_router::health::{HealthMonitor, Prober};
use fleet_router::registry::Registry;
use fleet_router::{ClientConfig, FleetClient};

mod common;

fn monitored(entry: &str) -> FleetClient {
    FleetClient::builder(entry)
        .config(ClientConfig {
            probe_interval_ms: 50,
            stale_after_ms: 100,
            probe_timeout_ms: 500,
            ..ClientConfig::default()
        })
        .probe_client(common::http_client())
        .build()
        .unwrap()
}

fn sequence_of(fleet: &FleetClient, index: usize) -> Option<i64> {
    fleet
        .snapshot()
        .nodes
        .iter()
        .find(|n| n.index == index)
        .map(|n| n.sequence)
}

#[tokio::test]
async fn test_monitor_seeds_and_probes_quiet_nodes() {
    let l0 = common::bind().await;
    let l1 = common::bind().await;
    let roster = common::Roster::new(
        1,
        common::roster_list(&[(0, l0.local_addr().unwrap()), (1, l1.local_addr().unwrap())]),
    );
    let n0 = common::start_node(l0, 0, roster.clone(), 5);
    let n1 = common::start_node(l1, 1, roster, 8);

    let fleet = monitored(&n0.url());

    assert!(
        common::eventually(Duration::from_secs(3), || sequence_of(&fleet, 1).unwrap_or(0) >= 1).await,
        "node 1 was never probed"
    );
    assert!(n1.hits() >= 1);
    assert_eq!(n1.forwarded(), 0);
    assert_eq!(fleet.snapshot().nodes[1].free, 8);
}

#[tokio::test]
async fn test_monitor_marks_vanished_node_dead() {
    let l0 = common::bind().await;
    let dead = common::dead_addr();
    let roster = common::Roster::new(1, common::roster_list(&[(0, l0.local_addr().unwrap()), (1, dead)]));
    let n0 = common::start_node(l0, 0, roster, 5);

    let fleet = monitored(&n0.url());

    assert!(
        common::eventually(Duration::from_secs(3), || sequence_of(&fleet, 1) == Some(-1)).await,
        "dead node was never marked"
    );
    assert!(sequence_of(&fleet, 0).unwrap() >= 1);
}

#[tokio::test]
async fn test_monitor_discovers_scale_down() {
    let l0 = common::bind().await;
    let l1 = common::bind().await;
    let a0 = l0.local_addr().unwrap();
    let roster = common::Roster::new(1, common::roster_list(&[(0, a0), (1, l1.local_addr().unwrap())]));
    let n0 = common::start_node(l0, 0, roster.clone(), 5);
    let _n1 = common::start_node(l1, 1, roster.clone(), 5);

    let fleet = monitored(&n0.url());
    assert!(common::eventually(Duration::from_secs(3), || fleet.snapshot().nodes.len() == 2).await);

    roster.set(2, common::roster_list(&[(0, a0)]));

    assert!(
        common::eventually(Duration::from_secs(3), || {
            let snapshot = fleet.snapshot();
            snapshot.version == 2 && snapshot.nodes.len() == 1
        })
        .await,
        "roster shrink was never observed"
    );
    assert_eq!(fleet.snapshot().highest_index, 0);
}

#[tokio::test]
async fn test_total_probe_failure_reseeds_from_entry() {
    let dead = common::dead_addr();
    let le = common::bind().await;
    let roster = common::Roster::new(1, common::roster_list(&[(0, dead)]));
    let entry = common::start_node(le, 5, roster, 1);

    let fleet = monitored(&entry.url());

    // Seed, probe the dead node, reset, reseed from the entry again.
    assert!(
        common::eventually(Duration::from_secs(3), || entry.hits() >= 3).await,
        "entry was not re-probed after every node died"
    );
    assert!(common::eventually(Duration::from_secs(3), || fleet.snapshot().version == 1).await);
    assert_eq!(entry.forwarded(), 0);
}

#[tokio::test]
async fn test_destroy_stops_probing() {
    let l0 = common::bind().await;
    let roster = common::Roster::new(1, common::roster_list(&[(0, l0.local_addr().unwrap())]));
    let n0: Arc<common::MockNode> = common::start_node(l0, 0, roster, 5);

    let fleet = monitored(&n0.url());
    assert!(common::eventually(Duration::from_secs(3), || n0.hits() >= 2).await);

    fleet.destroy();
    assert!(common::eventually(Duration::from_secs(3), || !fleet.monitor_running()).await);

    let hits = n0.hits();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(n0.hits(), hits);
}

#[tokio::test]
async fn test_cycle_probes_nodes_concurrently() {
    const NODES: usize = 4;
    let delay = Duration::from_millis(400);

    let mut listeners = Vec::new();
    for _ in 0..NODES {
        listeners.push(common::bind().await);
    }
    let addrs: Vec<_> = listeners
        .iter()
        .enumerate()
        .map(|(i, l)| (i, l.local_addr().unwrap()))
        .collect();
    let roster = common::Roster::new(1, common::roster_list(&addrs));
    let nodes: Vec<_> = listeners
        .into_iter()
        .enumerate()
        .map(|(i, l)| common::start_node(l, i, roster.clone(), 5))
        .collect();
    for node in &nodes {
        node.set_delay(delay);
    }

    let registry = Arc::new(Registry::new(nodes[0].url().parse().unwrap()));
    assert!(registry.apply_list_update(&common::roster_list(&addrs), 1));

    let prober = Prober::new(registry.clone(), common::http_client(), Some(Duration::from_secs(5)), 0);
    let monitor = HealthMonitor::new(registry.clone(), prober, Duration::from_secs(60), Duration::from_millis(100));

    let started = tokio::time::Instant::now();
    let successes = monitor.check_all().await;
    let elapsed = started.elapsed();

    assert_eq!(successes, NODES);
    assert!(nodes.iter().all(|n| n.hits() == 1));
    assert!(
        elapsed < delay * 2,
        "cycle took {:?}, probes were not concurrent",
        elapsed
    );
    assert!(registry.nodes().iter().all(|pod| pod.sequence() >= 1));
}
