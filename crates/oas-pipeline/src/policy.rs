//! # Compression Policy
//!
//! Decides, per artifact, whether the compression engine's output actually
//! replaces the original bytes. Compression is kept only when all of the
//! following hold:
//!
//! 1. the MIME classifier approves the content type,
//! 2. the payload is at least [`MIN_COMPRESSIBLE_BYTES`] (below this,
//!    framing overhead makes compression counter-productive),
//! 3. the compressed output is strictly smaller than the input.
//!
//! Engine failure degrades to pass-through with a warning; compression is
//! an optimization, never a correctness requirement.

use oas_core::{should_compress, CompressionAlgorithm, CompressionMetadata, ContentDigest};

use crate::compress;

/// Payloads below this size are passed through unmodified.
pub const MIN_COMPRESSIBLE_BYTES: usize = 1024;

/// Result of evaluating the compression policy for one artifact.
#[derive(Debug)]
pub enum CompressionOutcome {
    /// Store the original bytes, no metadata attached.
    PassThrough,
    /// Store the compressed bytes with provenance metadata.
    Compressed {
        bytes: Vec<u8>,
        metadata: CompressionMetadata,
    },
}

impl CompressionOutcome {
    /// True when compression was kept.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Compressed { .. })
    }
}

/// Evaluate the policy for one artifact.
///
/// `digest` is the SHA-256 of `bytes` (the original payload), recorded in
/// the provenance metadata so pull-side clients can verify the round trip.
pub fn evaluate(bytes: &[u8], media_type: &str, digest: &ContentDigest) -> CompressionOutcome {
    if !should_compress(media_type) {
        return CompressionOutcome::PassThrough;
    }
    if bytes.len() < MIN_COMPRESSIBLE_BYTES {
        tracing::debug!(
            size = bytes.len(),
            "payload below compression threshold, passing through"
        );
        return CompressionOutcome::PassThrough;
    }

    let compressed = match compress::compress(bytes) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "compression failed, passing through uncompressed");
            return CompressionOutcome::PassThrough;
        }
    };

    if compressed.len() >= bytes.len() {
        tracing::debug!(
            original = bytes.len(),
            compressed = compressed.len(),
            "compression did not shrink payload, passing through"
        );
        return CompressionOutcome::PassThrough;
    }

    let metadata = CompressionMetadata {
        algorithm: CompressionAlgorithm::Zstd,
        original_size: bytes.len() as u64,
        compressed_size: compressed.len() as u64,
        original_sha256: digest.clone(),
    };
    CompressionOutcome::Compressed {
        bytes: compressed,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas_core::sha256_digest;

    fn eval(bytes: &[u8], media_type: &str) -> CompressionOutcome {
        evaluate(bytes, media_type, &sha256_digest(bytes))
    }

    #[test]
    fn compressible_payload_over_threshold_is_compressed() {
        let payload = br#"{"key": "value"}"#.repeat(200); // ~3 KB of JSON
        let outcome = eval(&payload, "application/json");
        match outcome {
            CompressionOutcome::Compressed { bytes, metadata } => {
                assert!(bytes.len() < payload.len());
                assert_eq!(metadata.algorithm, CompressionAlgorithm::Zstd);
                assert_eq!(metadata.original_size, payload.len() as u64);
                assert_eq!(metadata.compressed_size, bytes.len() as u64);
                assert!(metadata.compressed_size < metadata.original_size);
                assert_eq!(metadata.original_sha256, sha256_digest(&payload));
            }
            CompressionOutcome::PassThrough => panic!("expected compression"),
        }
    }

    #[test]
    fn sub_threshold_payloads_pass_through_regardless_of_type() {
        let payload = br#"{"small": true}"#.repeat(20); // ~300 bytes, compressible type
        assert!(payload.len() < MIN_COMPRESSIBLE_BYTES);
        assert!(!eval(&payload, "application/json").is_compressed());
    }

    #[test]
    fn boundary_payload_at_threshold_is_compressed() {
        let payload = vec![b'a'; MIN_COMPRESSIBLE_BYTES];
        assert!(eval(&payload, "text/plain").is_compressed());
    }

    #[test]
    fn non_compressible_type_passes_through_regardless_of_size() {
        let payload = vec![0u8; 2 * 1024 * 1024];
        assert!(!eval(&payload, "image/png").is_compressed());
    }

    #[test]
    fn incompressible_content_passes_through() {
        // High-entropy bytes do not shrink under zstd; the result must be
        // discarded even though the type classifies as compressible.
        let payload: Vec<u8> = (0..4096u64)
            .map(|i| {
                let x = i.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (x >> 33) as u8
            })
            .collect();
        let outcome = eval(&payload, "text/plain");
        if let CompressionOutcome::Compressed { bytes, .. } = &outcome {
            // If zstd managed to shrink it, the invariant must still hold.
            assert!(bytes.len() < payload.len());
        }
    }

    #[test]
    fn decompressing_policy_output_restores_original() {
        let payload = b"line of text\n".repeat(500);
        if let CompressionOutcome::Compressed { bytes, .. } = eval(&payload, "text/plain") {
            assert_eq!(crate::compress::decompress(&bytes).unwrap(), payload);
        } else {
            panic!("expected compression");
        }
    }
}
