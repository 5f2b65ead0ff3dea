//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with forwarding and health handlers
//! - Wire up middleware (request ID, tracing, trace context, body limit)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use axum::http::uri::InvalidUri;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::downstream::DownstreamClient;
use crate::health;
use crate::http::handlers::{self, ForwardingState};
use crate::identity::Identity;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::trace_context_middleware;

/// HTTP server for the customer service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and identity.
    pub fn new(config: ServiceConfig, identity: Identity) -> Result<Self, InvalidUri> {
        let downstream = DownstreamClient::new(&config.downstream)?;

        let state = ForwardingState {
            downstream,
            identity: Arc::new(identity),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: ForwardingState) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::get_customer).post(handlers::add_recommendation),
            )
            .merge(health::routes())
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(trace_context_middleware))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until an OS signal or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream = %self.config.downstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
