//! Reusable test helpers for dispatch integration tests.
//!
//! Provides local webhook endpoints that record what they receive:
//!
//! - [`spawn_webhook_server()`] answers by path: the first path segment picks
//!   the behaviour (`/ok/..`, `/error/..`, `/slow-ok/..`, ...).
//! - [`spawn_garbage_server()`] answers every request with bytes that are not
//!   HTTP.
//! - [`closed_port_url()`] points at a port nothing listens on.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use jrnl_client::storage::MemoryStorage;
use jrnl_client::AppState;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// Test servers
// ============================================================================

/// A running test server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub url: String,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Full URL for `path` on this server.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

/// A request received by the webhook server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

/// Shared record of every request the webhook server received.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths received, sorted (arrival order depends on scheduling).
    pub fn sorted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.requests().into_iter().map(|r| r.path).collect();
        paths.sort();
        paths
    }
}

async fn webhook(
    State(recorder): State<Recorder>,
    method: axum::http::Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    recorder.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    let behaviour = uri
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string();

    match behaviour.as_str() {
        "ok" => StatusCode::NO_CONTENT.into_response(),
        "ok-json" => (StatusCode::OK, r#"{"id":"1","content":"echo"}"#).into_response(),
        "slow-ok" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            StatusCode::NO_CONTENT.into_response()
        }
        "slow-missing" => {
            tokio::time::sleep(Duration::from_millis(200)).await;
            StatusCode::NOT_FOUND.into_response()
        }
        "missing" => StatusCode::NOT_FOUND.into_response(),
        "rate" => StatusCode::TOO_MANY_REQUESTS.into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Spawn a webhook endpoint that records every request.
pub async fn spawn_webhook_server() -> (TestServer, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new()
        .fallback(webhook)
        .with_state(recorder.clone());
    (spawn_test_server(router).await, recorder)
}

/// Spawn a TCP server that replies to anything with non-HTTP bytes.
pub async fn spawn_garbage_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind garbage server");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(b"this is not an http response\r\n\r\n")
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/hook")
}

/// URL on a local port that refuses connections.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Failed to get local addr");
    drop(listener);
    format!("http://{addr}/hook")
}

// ============================================================================
// State helpers
// ============================================================================

/// In-memory app state holding the given `(name, endpoint)` targets.
pub fn state_with(targets: &[(&str, String)]) -> AppState {
    state_with_timeout(targets, Duration::from_secs(5))
}

/// Like [`state_with`], with a custom per-request timeout.
pub fn state_with_timeout(targets: &[(&str, String)], timeout: Duration) -> AppState {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");
    let state = AppState::with_storage(Arc::new(MemoryStorage::new()), http, 4);
    for (name, endpoint) in targets {
        state.store.add(*name, endpoint.clone());
    }
    state
}
