//! Liveness and readiness endpoints.
//!
//! Both endpoints answer 200 with an empty body. They perform no dependency
//! checks, so a down preference service never takes this instance out of
//! rotation.

use axum::{http::StatusCode, routing::get, Router};

pub const READY_PATH: &str = "/health/ready";
pub const LIVE_PATH: &str = "/health/live";

/// Health routes, mergeable into any router state.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(READY_PATH, get(ready))
        .route(LIVE_PATH, get(live))
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}

pub async fn live() -> StatusCode {
    StatusCode::OK
}
