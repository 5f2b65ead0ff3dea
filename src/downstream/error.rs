//! Downstream failure classes.

use axum::http::StatusCode;
use thiserror::Error;

/// Why a downstream exchange did not produce a usable body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownstreamError {
    /// The downstream answered with a non-2xx status.
    #[error("downstream responded {status}")]
    Http { status: StatusCode, body: String },

    /// No valid HTTP response was obtained.
    #[error("{message}")]
    Transport { message: String },
}

impl DownstreamError {
    /// Text reported to the caller: `"{code} {detail}"` for HTTP errors, the
    /// transport message otherwise.
    pub fn detail(&self) -> String {
        match self {
            DownstreamError::Http { status, body } => {
                format!("{} {}", status.as_u16(), http_error_detail(*status, body))
            }
            DownstreamError::Transport { message } => message.clone(),
        }
    }
}

/// Trimmed downstream body, or the status's reason phrase when the body
/// starts with `null`.
fn http_error_detail(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.starts_with("null") {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        body.to_string()
    }
}
