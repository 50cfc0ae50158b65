//! # MIME Compressibility Classification
//!
//! Maps a detected MIME type to a compress/do-not-compress decision.
//! Classification is pure string matching; content sniffing itself lives
//! in the pipeline crate.
//!
//! ## Ordering Invariant
//!
//! The non-compressible set is checked *first*. Some of its entries (the
//! generic `application/octet-stream` catch-all in particular) would
//! otherwise be shadowed by broader compressible rules. A false negative
//! merely skips an optimization; a false positive burns CPU recompressing
//! already-dense data.

/// MIME prefixes that must never be compressed: already-compressed archive
/// and media families, generic binary, and OCI/Docker media types.
const NON_COMPRESSIBLE_PREFIXES: &[&str] = &[
    "application/gzip",
    "application/x-gzip",
    "application/zip",
    "application/x-tar",
    "application/x-bzip2",
    "application/x-xz",
    "application/zstd",
    "application/vnd.oci.image",
    "application/vnd.docker",
    "application/octet-stream",
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/",
    "audio/",
];

/// MIME prefixes of text-based formats that compress well, including the
/// SBOM formats (CycloneDX, SPDX) this service commonly carries.
const COMPRESSIBLE_PREFIXES: &[&str] = &[
    "application/json",
    "application/xml",
    "text/xml",
    "text/plain",
    "text/html",
    "text/csv",
    "application/x-yaml",
    "application/yaml",
    "text/yaml",
    "application/ld+json",
    "application/vnd.cyclonedx+json",
    "application/vnd.cyclonedx+xml",
    "application/spdx+json",
    "application/spdx+xml",
];

/// Decide whether an artifact with the given MIME type should be compressed.
///
/// Pure and case-insensitive. First match wins, in this order:
///
/// 1. non-compressible prefix → `false`
/// 2. compressible prefix → `true`
/// 3. any other `text/` type → `true`
/// 4. unknown → `false`
pub fn should_compress(mime_type: &str) -> bool {
    let lower = mime_type.to_lowercase();

    if NON_COMPRESSIBLE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return false;
    }
    if COMPRESSIBLE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    lower.starts_with("text/")
}
