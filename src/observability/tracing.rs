//! Per-request trace context.
//!
//! # Responsibilities
//! - Continue the caller's trace (W3C `traceparent`) or start a new one
//! - Open the request span that handler events are recorded in
//! - Carry baggage set by handlers into the outbound request
//!
//! Handlers receive the context as an explicit `Extension<TraceContext>`
//! argument. A route served without [`trace_context_middleware`] rejects
//! requests with 500 because the extension is missing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use opentelemetry::baggage::BaggageExt;
use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId};
use opentelemetry::{Context, KeyValue};
use tracing::{Instrument, Span};

use crate::http::request::X_REQUEST_ID;
use crate::observability::propagation::{
    extract_context_from_headers, inject_context_into_headers,
};

/// OpenTelemetry context and span for a single request.
#[derive(Debug, Clone)]
pub struct TraceContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    trace_id: TraceId,
    span: Span,
    context: Mutex<Context>,
    baggage_writes: AtomicUsize,
}

impl TraceContext {
    /// Build the context for a request from its headers.
    ///
    /// A valid inbound `traceparent` keeps its trace ID; otherwise a fresh
    /// one is generated. Either way this request gets its own span ID.
    pub fn from_headers(headers: &HeaderMap, request_id: &str) -> Self {
        let parent = extract_context_from_headers(headers);
        let parent_span = parent.span();
        let parent_span_context = parent_span.span_context();

        let trace_id = if parent_span_context.is_valid() {
            parent_span_context.trace_id()
        } else {
            generate_trace_id()
        };
        let span_context = SpanContext::new(
            trace_id,
            generate_span_id(),
            TraceFlags::SAMPLED,
            false,
            parent_span_context.trace_state().clone(),
        );
        let context = parent.with_remote_span_context(span_context);

        let span = tracing::info_span!("trace", trace_id = %trace_id, request_id = %request_id);
        Self {
            inner: Arc::new(Inner {
                trace_id,
                span,
                context: Mutex::new(context),
                baggage_writes: AtomicUsize::new(0),
            }),
        }
    }

    pub fn trace_id(&self) -> TraceId {
        self.inner.trace_id
    }

    pub fn span(&self) -> &Span {
        &self.inner.span
    }

    /// Snapshot of the OpenTelemetry context, baggage included.
    pub fn context(&self) -> Context {
        self.inner
            .context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set a baggage item, replacing any previous value for `key`.
    pub fn set_baggage_item(&self, key: &str, value: &str) {
        {
            let mut context = self
                .inner
                .context
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *context = context.with_baggage(vec![KeyValue::new(key.to_string(), value.to_string())]);
        }
        self.inner.baggage_writes.fetch_add(1, Ordering::Relaxed);

        self.inner.span.in_scope(|| {
            tracing::debug!(key = %key, value = %value, "Baggage item set");
        });
    }

    /// Number of `set_baggage_item` calls made on this request.
    pub fn baggage_writes(&self) -> usize {
        self.inner.baggage_writes.load(Ordering::Relaxed)
    }

    /// Write `traceparent`, `tracestate` and `baggage` for an outbound call.
    pub fn inject(&self, headers: &mut HeaderMap) {
        inject_context_into_headers(&self.context(), headers);
    }
}

fn generate_trace_id() -> TraceId {
    TraceId::from_bytes(uuid::Uuid::new_v4().into_bytes())
}

fn generate_span_id() -> SpanId {
    let bytes = uuid::Uuid::new_v4().into_bytes();
    let mut id = [0u8; 8];
    id.copy_from_slice(&bytes[..8]);
    SpanId::from_bytes(id)
}

/// Install a [`TraceContext`] for the request and run the rest of the stack
/// inside its span.
///
/// Must sit inside the request-ID layer so the ID is already present.
pub async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let context = TraceContext::from_headers(request.headers(), &request_id);
    let span = context.span().clone();
    request.extensions_mut().insert(context.clone());

    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::debug!(
            trace_id = %context.trace_id(),
            baggage_writes = context.baggage_writes(),
            status = %response.status(),
            "Request finished"
        );
    });
    response
}
