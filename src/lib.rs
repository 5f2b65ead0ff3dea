//! Customer service library: forwards requests to the preference service.

pub mod config;
pub mod downstream;
pub mod health;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use identity::Identity;
pub use lifecycle::Shutdown;
