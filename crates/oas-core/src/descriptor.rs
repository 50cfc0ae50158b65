//! # Artifact Descriptor: the Store's Record for One Pushed Artifact
//!
//! An OCI-style descriptor: media type, size, content digest, and an opaque
//! annotation map. When compression was applied on push, the orchestrator
//! injects the provenance annotations below so a later pull, possibly
//! against a registry with no side channel, can reconstruct the original
//! media type and verify the original checksum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Annotation key: compression algorithm applied to the stored bytes.
pub const ANNOTATION_COMPRESSION_ALGORITHM: &str = "io.reliza.compression.algorithm";

/// Annotation key: MIME type of the artifact before the `+zstd` suffix.
pub const ANNOTATION_ORIGINAL_MEDIA_TYPE: &str = "io.reliza.original.mediatype";

/// Annotation key: decimal byte count of the original payload.
pub const ANNOTATION_ORIGINAL_SIZE: &str = "io.reliza.original.size";

/// Annotation key: decimal byte count of the compressed payload.
pub const ANNOTATION_COMPRESSED_SIZE: &str = "io.reliza.compressed.size";

/// Annotation key: 64-hex-char SHA-256 of the original payload.
pub const ANNOTATION_ORIGINAL_SHA256: &str = "io.reliza.original.sha256";

/// Standard OCI annotation carrying the artifact's file name.
pub const ANNOTATION_TITLE: &str = "org.opencontainers.image.title";

/// The store's metadata record for one pushed artifact.
///
/// Field names follow the OCI image-spec descriptor wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the stored bytes (with `+zstd` suffix when compressed).
    pub media_type: String,

    /// Registry digest of the stored bytes, e.g. `sha256:<hex>`.
    pub digest: String,

    /// Size in bytes of the stored payload.
    pub size: u64,

    /// Opaque annotation key/value pairs; keys unique, order irrelevant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Descriptor {
    /// Look up an annotation value by key.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .as_ref()
            .and_then(|a| a.get(key))
            .map(String::as_str)
    }
}
