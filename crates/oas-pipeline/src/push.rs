//! # Push Orchestrator
//!
//! Drives one upload end to end:
//!
//! ```text
//! Received → Buffered → ChecksumVerified → MimeDetected
//!          → CompressionEvaluated → Packaged → Pushed → Done
//! ```
//!
//! The caller buffers the inbound stream into a request-scoped temporary
//! file (Received → Buffered) and hands over its path; everything from the
//! checksum on happens here. An integrity mismatch aborts before any store
//! interaction; a store failure aborts with no partial-success signaling.

use std::path::Path;

use oas_core::{sha256_digest, ContentDigest, Descriptor};
use oas_registry::ArtifactStore;

use crate::error::PipelineError;
use crate::policy::{self, CompressionOutcome};
use crate::sniff;

/// Result of a completed push.
#[derive(Debug)]
pub struct PushOutcome {
    /// The store's descriptor for the pushed artifact.
    pub descriptor: Descriptor,
    /// SHA-256 of the original (pre-compression) bytes, identical whether
    /// or not compression occurred.
    pub digest: ContentDigest,
    /// Whether compression was applied.
    pub compressed: bool,
    /// Human-readable compression summary, present only when compressed.
    pub compression_stats: Option<String>,
}

/// Push the buffered artifact at `file_path` to `repo:tag`.
///
/// `expected_digest`, when supplied by the caller, is checked against the
/// computed digest before anything is sent to the store.
pub async fn push_artifact(
    store: &dyn ArtifactStore,
    repo: &str,
    tag: &str,
    file_path: &Path,
    expected_digest: Option<&ContentDigest>,
) -> Result<PushOutcome, PipelineError> {
    // Buffered → ChecksumVerified
    let bytes = tokio::fs::read(file_path).await?;
    let digest = sha256_digest(&bytes);

    if let Some(expected) = expected_digest {
        if *expected != digest {
            tracing::warn!(
                expected = %expected,
                actual = %digest,
                "integrity check failed, rejecting before store interaction"
            );
            return Err(PipelineError::IntegrityMismatch {
                expected: expected.clone(),
                actual: digest,
            });
        }
    }

    // ChecksumVerified → MimeDetected. Detection failure degrades to a
    // generic binary type rather than aborting.
    let detected = sniff::detect(&bytes).unwrap_or_else(|| {
        tracing::warn!("MIME detection inconclusive, defaulting to application/octet-stream");
        sniff::octet_stream()
    });

    // MimeDetected → CompressionEvaluated
    let outcome = policy::evaluate(&bytes, &detected.media_type, &digest);

    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(tag)
        .to_string();

    // CompressionEvaluated → Packaged → Pushed. The compressed payload is
    // staged in its own scoped directory, released on every exit path.
    let (descriptor, compressed, compression_stats) = match outcome {
        CompressionOutcome::PassThrough => {
            let descriptor = store
                .push(
                    repo,
                    tag,
                    &detected.media_type,
                    file_path,
                    Default::default(),
                )
                .await?;
            (descriptor, false, None)
        }
        CompressionOutcome::Compressed {
            bytes: compressed_bytes,
            metadata,
        } => {
            let staging = tempfile::tempdir()?;
            let staged_path = staging.path().join(&file_name);
            tokio::fs::write(&staged_path, &compressed_bytes).await?;

            let media_type = format!("{}+zstd", detected.media_type);
            let annotations = metadata.annotations(&detected.media_type);
            let stats = metadata.stats();
            tracing::info!(repo, tag, %digest, stats = %stats, "compressing artifact for push");

            let descriptor = store
                .push(repo, tag, &media_type, &staged_path, annotations)
                .await?;
            (descriptor, true, Some(stats))
        }
    };

    tracing::info!(repo, tag, %digest, compressed, "artifact pushed");
    Ok(PushOutcome {
        descriptor,
        digest,
        compressed,
        compression_stats,
    })
}
