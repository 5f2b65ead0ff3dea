//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     → logging.rs (global subscriber, level and format from config)
//!
//! Per request:
//!     → tower-http TraceLayer (HTTP span)
//!     → propagation.rs (extract traceparent / tracestate / baggage)
//!     → tracing.rs (TraceContext: request span + baggage)
//!     → handler events recorded inside the request span
//!     → propagation.rs (inject into the downstream request)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - W3C Trace Context and Baggage via OpenTelemetry propagators
//! - Baggage is per-request state, never global

pub mod logging;
pub mod propagation;
pub mod tracing;

pub use self::tracing::{trace_context_middleware, TraceContext};
