//! Instance identity reported on every successful response.
//!
//! The instance ID is derived once at startup from the container hostname.
//! The application version is looked up from the environment on every call
//! so a changed value is picked up without a restart.

use crate::config::IdentityConfig;

/// Value used when an identity variable is missing or blank.
pub const UNKNOWN: &str = "unknown";

const DEPLOYMENT_PREFIX: &str = "recommendation-v";

/// Strip a leading `recommendation-v<digits>-` deployment prefix.
///
/// Hostnames without the prefix are returned unchanged.
pub fn parse_container_id_from_hostname(hostname: &str) -> &str {
    let Some(rest) = hostname.strip_prefix(DEPLOYMENT_PREFIX) else {
        return hostname;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return hostname;
    }
    match rest[digits..].strip_prefix('-') {
        Some(container_id) => container_id,
        None => hostname,
    }
}

/// Read-only identity shared by every request handler.
#[derive(Debug, Clone)]
pub struct Identity {
    instance_id: String,
    version_var: String,
}

impl Identity {
    /// Build an identity from an already-resolved hostname.
    pub fn new(hostname: Option<&str>, version_var: impl Into<String>) -> Self {
        let instance_id = match hostname {
            Some(hostname) => parse_container_id_from_hostname(hostname).to_string(),
            None => UNKNOWN.to_string(),
        };
        Self {
            instance_id,
            version_var: version_var.into(),
        }
    }

    /// Resolve the identity from the process environment.
    ///
    /// A hostname that is not valid Unicode is decoded lossily; only an
    /// unset variable yields `unknown`.
    pub fn from_env(config: &IdentityConfig) -> Self {
        let hostname = std::env::var_os(&config.hostname_var)
            .map(|v| v.to_string_lossy().into_owned());
        Self::new(hostname.as_deref(), config.version_var.clone())
    }

    /// Container ID derived from the hostname at startup.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Current application version, or `unknown` if unset or blank.
    pub fn app_version(&self) -> String {
        std::env::var(&self.version_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}
