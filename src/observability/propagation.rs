//! W3C Trace Context and Baggage propagation over HTTP headers.
//!
//! Inbound `traceparent`, `tracestate` and `baggage` headers are extracted
//! into an OpenTelemetry [`Context`]; outbound requests get the same headers
//! injected from the request's context.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{
    Extractor, Injector, TextMapCompositePropagator, TextMapPropagator,
};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};

/// Trace context plus baggage, in that order.
fn composite_propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

/// Read-only view of request headers for the propagators.
pub struct HeaderExtractor<'a>(pub &'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    /// Missing headers and non-UTF-8 values both read as `None`.
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Writable view of outbound headers for the propagators.
pub struct HeaderInjector<'a>(pub &'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    /// Invalid names or values are skipped.
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

/// Extract trace context and baggage from inbound headers.
///
/// Without a valid `traceparent` the returned context has no remote span,
/// but any `baggage` header is still honoured.
pub fn extract_context_from_headers(headers: &HeaderMap) -> Context {
    composite_propagator().extract(&HeaderExtractor(headers))
}

/// Inject trace context and baggage into outbound headers.
pub fn inject_context_into_headers(cx: &Context, headers: &mut HeaderMap) {
    composite_propagator().inject_context(cx, &mut HeaderInjector(headers));
}
