//! Pipeline error taxonomy.
//!
//! A closed enumeration replacing free-form error strings: integrity and
//! corruption failures abort with no partial network effects, store errors
//! are terminal, and detection/compression degradation is logged at the
//! call site rather than surfaced as an error at all.

use thiserror::Error;

use oas_core::ContentDigest;
use oas_registry::StoreError;

/// Errors that abort a push or pull request.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The caller-supplied digest disagrees with the computed digest.
    /// Rejected before any store interaction.
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch {
        expected: ContentDigest,
        actual: ContentDigest,
    },

    /// Stored bytes claim zstd but fail to decode. Never served.
    #[error("corrupt compressed payload: {source}")]
    CorruptPayload {
        #[source]
        source: std::io::Error,
    },

    /// Remote store push/pull failure, surfaced with the underlying cause.
    #[error("artifact store error: {0}")]
    Store(#[from] StoreError),

    /// Local I/O failure on a request-scoped temporary resource.
    #[error("pipeline I/O error: {0}")]
    Io(#[from] std::io::Error),
}
