//! # Pull Orchestrator
//!
//! Drives one download end to end:
//!
//! ```text
//! Requested → Fetched → CompressionDetected → Decompressed
//!           → TypeResolved → Served
//! ```
//!
//! Compression state is resolved in two tiers: the descriptor's annotations
//! are authoritative when present; otherwise the payload's leading bytes are
//! sniffed for the zstd frame magic, so artifacts pushed by out-of-band
//! tools still decompress. Corrupt frames are never served.

use std::path::PathBuf;

use oas_core::{CompressionAlgorithm, Descriptor, ANNOTATION_COMPRESSION_ALGORITHM};
use oas_registry::{ArtifactStore, StoreError};

use crate::compress;
use crate::error::PipelineError;
use crate::sniff;

/// A fully materialized artifact, ready to serve.
#[derive(Debug)]
pub struct PulledArtifact {
    /// Final (decompressed, when applicable) payload.
    pub bytes: Vec<u8>,
    /// Media type re-sniffed from the final bytes.
    pub media_type: String,
    /// Conventional filename extension for `media_type`, with leading dot.
    pub extension: String,
    /// The store's descriptor as fetched.
    pub descriptor: Descriptor,
}

/// Pull `repo:tag` from the store and restore the original payload.
pub async fn pull_artifact(
    store: &dyn ArtifactStore,
    repo: &str,
    tag: &str,
) -> Result<PulledArtifact, PipelineError> {
    // Requested → Fetched. The staging directory is owned here and released
    // on every exit path.
    let staging = tempfile::tempdir()?;
    let descriptor = store.pull(repo, tag, staging.path()).await?;
    let path = single_file_in(staging.path())?;
    let raw = tokio::fs::read(&path).await?;

    // Fetched → CompressionDetected. Annotations first, magic fallback.
    let annotated_zstd = descriptor.annotation(ANNOTATION_COMPRESSION_ALGORITHM)
        == Some(CompressionAlgorithm::Zstd.as_str());
    let compressed = annotated_zstd || compress::is_zstd_magic(&raw);
    if compressed && !annotated_zstd {
        tracing::debug!(repo, tag, "no compression annotation, detected zstd by frame magic");
    }

    // CompressionDetected → Decompressed
    let bytes = if compressed {
        compress::decompress(&raw).map_err(|source| {
            tracing::error!(repo, tag, error = %source, "stored payload failed zstd decode");
            PipelineError::CorruptPayload { source }
        })?
    } else {
        raw
    };

    // Decompressed → TypeResolved. Always re-sniffed from the final bytes,
    // never trusted from the stored media type.
    let detected = sniff::detect(&bytes).unwrap_or_else(|| {
        tracing::warn!(repo, tag, "MIME detection inconclusive, serving as octet-stream");
        sniff::octet_stream()
    });

    if let Err(e) = staging.close() {
        tracing::warn!(error = %e, "failed to remove pull staging directory");
    }

    tracing::info!(repo, tag, compressed, media_type = %detected.media_type, "artifact pulled");
    Ok(PulledArtifact {
        bytes,
        media_type: detected.media_type,
        extension: detected.extension,
        descriptor,
    })
}

/// The store must materialize exactly one regular file into the staging
/// directory; anything else means the artifact layout is not one this
/// pipeline produced.
fn single_file_in(dir: &std::path::Path) -> Result<PathBuf, PipelineError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    match files.as_slice() {
        [single] => Ok(single.clone()),
        _ => Err(PipelineError::Store(StoreError::InvalidArtifact(format!(
            "expected exactly one file in pulled artifact, found {}",
            files.len()
        )))),
    }
}
