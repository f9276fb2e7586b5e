//! Mock fleet nodes for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;

use fleet_router::{FleetReport, NodeList, ProxyStatus};

/// Roster shared by every node of a mock fleet.
#[derive(Debug, Default)]
pub struct Roster {
    inner: Mutex<(i64, NodeList)>,
}

impl Roster {
    pub fn new(version: i64, list: NodeList) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new((version, list)),
        })
    }

    pub fn set(&self, version: i64, list: NodeList) {
        *self.inner.lock().unwrap() = (version, list);
    }

    fn get(&self) -> (i64, NodeList) {
        self.inner.lock().unwrap().clone()
    }
}

/// A programmable fleet node.
#[derive(Debug)]
pub struct MockNode {
    pub addr: SocketAddr,
    pub ordinal: usize,
    pub free: AtomicI64,
    pub status: AtomicU16,
    pub counter: AtomicI64,
    pub malformed: AtomicBool,
    /// Delay before answering, in milliseconds.
    pub delay_ms: AtomicU64,
    /// Every request, probes included.
    pub hits: AtomicUsize,
    /// Requests carrying `Proxy-Forward-To`.
    pub forwarded: AtomicUsize,
    pub last_forwarded: Mutex<Option<HeaderMap>>,
    pub last_ensure: Mutex<Option<String>>,
    roster: Arc<Roster>,
}

impl MockNode {
    pub fn set_free(&self, free: i64) {
        self.free.store(free, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::SeqCst)
    }

    pub fn last_forwarded_header(&self, name: &str) -> Option<String> {
        let headers = self.last_forwarded.lock().unwrap();
        headers
            .as_ref()?
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    }

    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

/// Reserve a loopback listener for a node.
pub async fn bind() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

/// A loopback address nothing listens on.
pub fn dead_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Start serving a mock node on `listener`.
pub fn start_node(listener: TcpListener, ordinal: usize, roster: Arc<Roster>, free: i64) -> Arc<MockNode> {
    let node = Arc::new(MockNode {
        addr: listener.local_addr().unwrap(),
        ordinal,
        free: AtomicI64::new(free),
        status: AtomicU16::new(202),
        counter: AtomicI64::new(0),
        malformed: AtomicBool::new(false),
        delay_ms: AtomicU64::new(0),
        hits: AtomicUsize::new(0),
        forwarded: AtomicUsize::new(0),
        last_forwarded: Mutex::new(None),
        last_ensure: Mutex::new(None),
        roster,
    });

    let app = Router::new()
        .route("/", any(handle))
        .route("/{*path}", any(handle))
        .with_state(node.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    node
}

async fn handle(State(node): State<Arc<MockNode>>, headers: HeaderMap) -> Response {
    node.hits.fetch_add(1, Ordering::SeqCst);
    if headers.contains_key("proxy-forward-to") {
        node.forwarded.fetch_add(1, Ordering::SeqCst);
        *node.last_forwarded.lock().unwrap() = Some(headers.clone());
    }
    if let Some(ensure) = headers.get("proxy-ensure-requests") {
        *node.last_ensure.lock().unwrap() = Some(ensure.to_str().unwrap().to_string());
    }

    let delay = node.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let (version, list) = node.roster.get();
    let status = node.status.load(Ordering::SeqCst);
    let report = FleetReport {
        free: node.free.load(Ordering::SeqCst),
        ordinal: node.ordinal,
        version,
        counter: node.counter.fetch_add(1, Ordering::SeqCst) + 1,
        status: ProxyStatus::from(status),
        list,
    };

    let mut response = Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .body(Body::from("ok"))
        .unwrap();
    report.write_headers(response.headers_mut()).unwrap();
    if node.malformed.load(Ordering::SeqCst) {
        response.headers_mut().remove("proxy-counter");
    }
    response
}

/// HTTP client without pooled connections or environment proxies.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Roster from `(index, addr)` pairs.
pub fn roster_list(entries: &[(usize, SocketAddr)]) -> NodeList {
    entries.iter().map(|(i, a)| (*i, a.to_string())).collect()
}

/// Poll `check` until it holds or `timeout` passes.
pub async fn eventually<F: Fn() -> bool>(timeout: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}
