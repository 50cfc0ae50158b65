//! # oas-core: Foundational Types for the OCI Artifact Service
//!
//! Leaf crate of the workspace DAG: domain types shared by the transfer
//! pipeline, the registry client, and the HTTP surface.
//!
//! ## Key Design Principles
//!
//! 1. **`ContentDigest` newtype.** A digest is a validated 32-byte SHA-256
//!    value, never a bare hex string. The digest is always computed over the
//!    *original* artifact bytes; compression never changes it.
//!
//! 2. **Absence is meaningful.** `CompressionMetadata` exists only when
//!    compression was applied *and* shrank the payload. An uncompressed
//!    artifact carries no metadata object at all, which is distinct from a
//!    present-but-`None` algorithm.
//!
//! 3. **Pure classification.** [`mime::should_compress`] is a deterministic
//!    function of the MIME string with no I/O and no state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `oas-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod digest;
pub mod metadata;
pub mod mime;

// Re-export primary types for ergonomic imports.
pub use descriptor::{
    Descriptor, ANNOTATION_COMPRESSED_SIZE, ANNOTATION_COMPRESSION_ALGORITHM,
    ANNOTATION_ORIGINAL_MEDIA_TYPE, ANNOTATION_ORIGINAL_SHA256, ANNOTATION_ORIGINAL_SIZE,
};
pub use digest::{sha256_digest, ContentDigest, DigestError};
pub use metadata::{CompressionAlgorithm, CompressionMetadata};
pub use mime::should_compress;
