//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, content-type check, header reads)
//!     → handlers.rs (one downstream call per request)
//!     → response.rs (template, identity headers, 503 mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::ForwardingState;
pub use request::{PlainText, X_REQUEST_ID};
pub use server::HttpServer;
