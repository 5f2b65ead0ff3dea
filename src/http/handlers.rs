//! Forwarding handlers for `/`.
//!
//! Each handler makes exactly one downstream call and converts the outcome
//! into a response. POST error bodies are returned bare while GET error
//! bodies go through the customer template; callers rely on both shapes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::downstream::{DownstreamClient, DownstreamError};
use crate::http::request::{header_text, PlainText};
use crate::http::response;
use crate::identity::Identity;
use crate::observability::TraceContext;

pub const USER_PREFERENCE: &str = "user-preference";

/// Handler state, immutable after startup.
#[derive(Clone)]
pub struct ForwardingState {
    pub downstream: DownstreamClient,
    pub identity: Arc<Identity>,
}

/// `POST /`: forward a plain-text body downstream.
pub async fn add_recommendation(
    State(state): State<ForwardingState>,
    Extension(trace): Extension<TraceContext>,
    PlainText(body): PlainText,
) -> Response {
    tracing::info!(
        version = %state.identity.app_version(),
        "Adding recommendation"
    );

    match state.downstream.post(body, &trace).await {
        Ok(text) => response::success(&state.identity, &text),
        Err(err @ DownstreamError::Http { .. }) => {
            tracing::warn!(error = %err, detail = %err.detail(), "Failed to post to preference service");
            response::unavailable(err.detail())
        }
        Err(DownstreamError::Transport { message }) => {
            tracing::warn!(error = %message, "Failed to post to preference service");
            response::unavailable(message)
        }
    }
}

/// `GET /`: tag the trace with the caller's agent and preference, then
/// fetch from downstream. The baggage travels with the outbound request.
pub async fn get_customer(
    State(state): State<ForwardingState>,
    Extension(trace): Extension<TraceContext>,
    headers: HeaderMap,
) -> Response {
    let Some(user_agent) = header_text(&headers, header::USER_AGENT.as_str()) else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing request header 'User-Agent'",
        )
            .into_response();
    };

    trace.set_baggage_item("user-agent", &user_agent);
    if let Some(preference) = header_text(&headers, USER_PREFERENCE).filter(|p| !p.is_empty()) {
        trace.set_baggage_item(USER_PREFERENCE, &preference);
    }

    match state.downstream.get(&trace).await {
        Ok(text) => response::success(&state.identity, &text),
        Err(err @ DownstreamError::Http { .. }) => {
            tracing::warn!(error = %err, detail = %err.detail(), "Failed to get response from preference service");
            response::unavailable(response::format_body(&err.detail()))
        }
        Err(DownstreamError::Transport { message }) => {
            tracing::warn!(error = %message, "Failed to get response from preference service");
            response::unavailable(response::format_body(&message))
        }
    }
}
