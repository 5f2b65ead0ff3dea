//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file. Every field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};

/// Default downstream preference service URL.
pub const DEFAULT_DOWNSTREAM_URL: &str = "http://preference:8080";

/// Root configuration for the customer service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Downstream preference service settings.
    pub downstream: DownstreamConfig,

    /// Environment variables the instance identity is read from.
    pub identity: IdentityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Downstream service configuration.
///
/// Both timeouts are unset by default, in which case the HTTP client's own
/// defaults apply.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// URL every forwarded request is sent to.
    pub url: String,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,

    /// Total time allowed for one downstream exchange in milliseconds.
    pub request_timeout_ms: Option<u64>,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DOWNSTREAM_URL.to_string(),
            connect_timeout_ms: None,
            request_timeout_ms: None,
        }
    }
}

/// Names of the environment variables that identify this instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Variable holding the container hostname.
    pub hostname_var: String,

    /// Variable holding the application version.
    pub version_var: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            hostname_var: "HOSTNAME".to_string(),
            version_var: "customerVersion".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Output format for log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
