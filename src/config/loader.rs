//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `downstream.url`.
pub const DOWNSTREAM_URL_ENV: &str = "PREFERENCES_API_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override and validate configuration.
///
/// With no path the built-in defaults are used; environment overrides and
/// validation apply either way.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using the given variable lookup.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(DOWNSTREAM_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.downstream.url = url.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("customer-{}-{}.toml", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_env_override_replaces_url() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == DOWNSTREAM_URL_ENV).then(|| "http://localhost:9999".to_string())
        });
        assert_eq!(config.downstream.url, "http://localhost:9999");
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));
        assert_eq!(config.downstream.url, "http://preference:8080");
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_config(
            "load",
            "[listener]\nbind_address = \"127.0.0.1:9080\"\n",
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9080");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = temp_config(
            "invalid",
            "[listener]\nbind_address = \"nowhere\"\nmax_body_bytes = 0\n",
        );
        let err = load_config(Some(&path)).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
