//! # Registry Configuration
//!
//! Explicit configuration struct built once at process start and passed by
//! reference into the store constructor. Pipeline logic never performs
//! ambient env lookups, so it stays testable with injected fake stores.

use thiserror::Error;

/// Errors from loading registry configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// Connection settings for the remote OCI registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry host, with or without a scheme (`registry.example.com` or
    /// `https://registry.example.com`).
    pub host: String,
    /// Username for basic authentication.
    pub username: String,
    /// Token/password for basic authentication.
    pub token: String,
}

impl RegistryConfig {
    /// Load configuration from `REGISTRY_HOST`, `REGISTRY_USERNAME`, and
    /// `REGISTRY_TOKEN`.
    ///
    /// All three are required. Call this during startup validation so a
    /// misconfigured deployment fails fast with a clear diagnostic instead
    /// of erroring inside a request handler.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: require_var("REGISTRY_HOST")?,
            username: require_var("REGISTRY_USERNAME")?,
            token: require_var("REGISTRY_TOKEN")?,
        })
    }

    /// Base URL for API requests: the host with an `https://` scheme
    /// prepended unless one is already present.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        }
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_prepends_https() {
        let config = RegistryConfig {
            host: "registry.example.com".into(),
            username: "u".into(),
            token: "t".into(),
        };
        assert_eq!(config.base_url(), "https://registry.example.com");
    }

    #[test]
    fn base_url_keeps_explicit_scheme() {
        let config = RegistryConfig {
            host: "http://localhost:5000".into(),
            username: "u".into(),
            token: "t".into(),
        };
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = RegistryConfig {
            host: "https://registry.example.com/".into(),
            username: "u".into(),
            token: "t".into(),
        };
        assert_eq!(config.base_url(), "https://registry.example.com");
    }

    #[test]
    fn missing_var_error_names_the_variable() {
        let err = ConfigError::MissingVar("REGISTRY_HOST");
        assert!(err.to_string().contains("REGISTRY_HOST"));
    }
}
