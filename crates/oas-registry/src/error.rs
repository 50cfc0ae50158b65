//! Artifact store error types.

use thiserror::Error;

/// Errors from remote store push/pull operations.
///
/// Transport and protocol failures are terminal for the request that
/// triggered them; the pipeline performs no internal retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The registry returned a non-success status.
    #[error("registry {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The stored artifact violates this pipeline's shape contract
    /// (e.g. not exactly one file/layer per artifact).
    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    /// The requested tag does not exist in the repository.
    #[error("artifact not found: {repo}:{tag}")]
    NotFound { repo: String, tag: String },

    /// Local filesystem failure while staging or materializing bytes.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
