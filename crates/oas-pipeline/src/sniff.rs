//! # Content Sniffing: Media Type from Bytes
//!
//! Determines a MIME type and filename extension from artifact content:
//! binary formats via the `infer` crate's magic-byte database, text formats
//! via a UTF-8 heuristic (JSON, XML, HTML, plain text). Detection failure
//! is never fatal; callers degrade to `application/octet-stream`.

// IgnoredAny validates JSON without building a value tree.
use serde::de::IgnoredAny;

/// A detected media type with its conventional filename extension
/// (including the leading dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    pub media_type: String,
    pub extension: String,
}

impl DetectedType {
    fn new(media_type: &str, extension: &str) -> Self {
        Self {
            media_type: media_type.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// The fallback type used when detection is inconclusive.
pub fn octet_stream() -> DetectedType {
    DetectedType::new("application/octet-stream", ".bin")
}

/// Sniff the media type of `bytes`.
///
/// Returns `None` when the content matches no known binary signature and is
/// not valid UTF-8 text.
pub fn detect(bytes: &[u8]) -> Option<DetectedType> {
    if bytes.is_empty() {
        return None;
    }

    if let Some(kind) = infer::get(bytes) {
        return Some(DetectedType {
            media_type: kind.mime_type().to_string(),
            extension: format!(".{}", kind.extension()),
        });
    }

    let text = std::str::from_utf8(bytes).ok()?;
    Some(detect_text(text))
}

/// Classify UTF-8 text content.
fn detect_text(text: &str) -> DetectedType {
    let trimmed = text.trim_start();

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<IgnoredAny>(text).is_ok()
    {
        return DetectedType::new("application/json", ".json");
    }
    if trimmed.starts_with("<?xml") {
        return DetectedType::new("application/xml", ".xml");
    }
    let lower = trimmed.get(..trimmed.len().min(64)).unwrap_or("").to_lowercase();
    if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
        return DetectedType::new("text/html", ".html");
    }
    DetectedType::new("text/plain", ".txt")
}
