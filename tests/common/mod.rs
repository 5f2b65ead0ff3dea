//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::Router;
use customer::{HttpServer, Identity, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

/// Start a programmable mock downstream on an ephemeral port.
///
/// The closure receives the request method and body and returns the status
/// code and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(Method, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let f = Arc::new(f);
    let app = Router::new().route(
        "/",
        any(move |method: Method, body: String| {
            let f = f.clone();
            async move {
                let (status, body) = f(method, body).await;
                (StatusCode::from_u16(status).unwrap(), body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A request as seen by the recording backend.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: String,
}

/// Start a mock downstream that answers 200 `ok` and records every request.
#[allow(dead_code)]
pub async fn start_recording_backend() -> (SocketAddr, Arc<Mutex<Vec<RecordedRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let app = Router::new().route(
        "/",
        any(move |method: Method, headers: HeaderMap, body: String| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(RecordedRequest { method, headers, body });
                "ok"
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, seen)
}

/// Baggage entries of a W3C `baggage` header, in order.
#[allow(dead_code)]
pub fn baggage_entries(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all("baggage")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|entry| {
            let (key, value) = entry.split(';').next()?.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Start a mock downstream that always returns the same response.
#[allow(dead_code)]
pub async fn start_fixed_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move |_, _| async move { (status, body.to_string()) }).await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start the customer service against `downstream`.
///
/// The returned [`Shutdown`] must be kept alive for the server to keep
/// running.
#[allow(dead_code)]
pub async fn start_service(downstream: SocketAddr, identity: Identity) -> (SocketAddr, Shutdown) {
    let mut config = ServiceConfig::default();
    config.downstream.url = format!("http://{}", downstream);
    start_service_with(config, identity).await
}

#[allow(dead_code)]
pub async fn start_service_with(mut config: ServiceConfig, identity: Identity) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, identity).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Identity whose version variable is never set by any test.
#[allow(dead_code)]
pub fn anonymous_identity() -> Identity {
    Identity::new(None, "CUSTOMER_IT_UNSET_VERSION")
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
