//! # Compression Provenance Metadata
//!
//! Value object produced only when compression was applied *and* shrank the
//! payload. Absence of a `CompressionMetadata` means "not compressed"; the
//! pipeline never stores a present-but-none marker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::{
    ANNOTATION_COMPRESSED_SIZE, ANNOTATION_COMPRESSION_ALGORITHM, ANNOTATION_ORIGINAL_MEDIA_TYPE,
    ANNOTATION_ORIGINAL_SHA256, ANNOTATION_ORIGINAL_SIZE,
};
use crate::digest::ContentDigest;

/// The compression algorithm applied to stored artifact bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// No compression.
    None,
    /// Zstandard.
    Zstd,
}

impl CompressionAlgorithm {
    /// Canonical string form used in annotations.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zstd => "zstd",
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a compression that was actually kept.
///
/// Invariant: `compressed_size < original_size`. The compression policy only
/// constructs this object on genuine shrinkage; a result that grew the
/// payload is discarded and the artifact is passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionMetadata {
    /// Algorithm that produced the stored bytes.
    pub algorithm: CompressionAlgorithm,
    /// Byte count of the original payload.
    pub original_size: u64,
    /// Byte count of the compressed payload.
    pub compressed_size: u64,
    /// SHA-256 of the original payload.
    pub original_sha256: ContentDigest,
}

impl CompressionMetadata {
    /// Build the four provenance annotations plus the original media type.
    ///
    /// These keys are the bit-exact contract read by the pull path and by
    /// external clients; see [`crate::descriptor`].
    pub fn annotations(&self, original_media_type: &str) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(
            ANNOTATION_COMPRESSION_ALGORITHM.to_string(),
            self.algorithm.as_str().to_string(),
        );
        map.insert(
            ANNOTATION_ORIGINAL_MEDIA_TYPE.to_string(),
            original_media_type.to_string(),
        );
        map.insert(
            ANNOTATION_ORIGINAL_SIZE.to_string(),
            self.original_size.to_string(),
        );
        map.insert(
            ANNOTATION_COMPRESSED_SIZE.to_string(),
            self.compressed_size.to_string(),
        );
        map.insert(
            ANNOTATION_ORIGINAL_SHA256.to_string(),
            self.original_sha256.to_hex(),
        );
        map
    }

    /// Human-readable compression effectiveness summary for API responses.
    pub fn stats(&self) -> String {
        let ratio = self.original_size as f64 / self.compressed_size as f64;
        let savings = (1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0;
        format!(
            "Compressed {} bytes → {} bytes ({ratio:.2}x ratio, {savings:.2}% savings)",
            self.original_size, self.compressed_size
        )
    }
}
