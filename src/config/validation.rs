//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All errors are
//! collected so a broken config is reported in one pass.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("downstream.url `{url}` is invalid: {reason}")]
    DownstreamUrl { url: String, reason: String },

    #[error("downstream.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("identity.{0} must not be empty")]
    EmptyVariableName(&'static str),
}

/// Validate a parsed config, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if let Err(reason) = check_downstream_url(&config.downstream.url) {
        errors.push(ValidationError::DownstreamUrl {
            url: config.downstream.url.clone(),
            reason,
        });
    }
    if config.downstream.connect_timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_ms"));
    }
    if config.downstream.request_timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout("request_timeout_ms"));
    }

    if config.identity.hostname_var.trim().is_empty() {
        errors.push(ValidationError::EmptyVariableName("hostname_var"));
    }
    if config.identity.version_var.trim().is_empty() {
        errors.push(ValidationError::EmptyVariableName("version_var"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// The downstream client speaks plain HTTP only.
fn check_downstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.scheme() != "http" {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
