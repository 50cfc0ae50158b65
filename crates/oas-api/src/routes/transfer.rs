//! # Artifact Transfer API
//!
//! Routes:
//! - POST /push: multipart upload (`file`, `repo`, `tag`, optional
//!   `inputDigest`), compressed transparently when worthwhile
//! - GET  /pull?repo=&tag=: download with the original bytes, content type,
//!   and a filename derived from the tag

use std::path::{Path, PathBuf};

use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use oas_core::{ContentDigest, Descriptor};
use oas_pipeline::{pull_artifact, push_artifact};

use crate::error::AppError;
use crate::state::AppState;

/// Transfer router: push and pull.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/push", post(push))
        .route("/pull", get(pull))
}

/// Response body for a successful push.
#[derive(Debug, Serialize, Deserialize)]
pub struct PushResponse {
    /// The store's descriptor for the artifact as pushed.
    #[serde(rename = "ociResponse")]
    pub oci_response: Descriptor,
    /// SHA-256 hex of the original uploaded bytes.
    #[serde(rename = "fileSHA256Digest")]
    pub file_sha256_digest: String,
    /// Whether compression was applied before storage.
    pub compressed: bool,
    /// Compression effectiveness summary, present only when compressed.
    #[serde(rename = "compressionStats", skip_serializing_if = "Option::is_none")]
    pub compression_stats: Option<String>,
}

async fn push(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PushResponse>, AppError> {
    // The upload is buffered into a request-scoped directory; Drop removes
    // it whether the push succeeds or not.
    let staging = tempfile::tempdir()
        .map_err(|e| AppError::Internal(format!("failed to create staging directory: {e}")))?;

    let mut file_path: Option<PathBuf> = None;
    let mut repo: Option<String> = None;
    let mut tag: Option<String> = None;
    let mut input_digest: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(sanitize_file_name)
                    .unwrap_or_else(|| "artifact.bin".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file field: {e}")))?;
                let path = staging.path().join(&file_name);
                tokio::fs::write(&path, &bytes)
                    .await
                    .map_err(|e| AppError::Internal(format!("failed to buffer upload: {e}")))?;
                file_path = Some(path);
            }
            "repo" => repo = Some(read_text_field(field, "repo").await?),
            "tag" => tag = Some(read_text_field(field, "tag").await?),
            "inputDigest" => input_digest = Some(read_text_field(field, "inputDigest").await?),
            // Unknown fields are ignored, not rejected.
            _ => {}
        }
    }

    let file_path = file_path
        .ok_or_else(|| AppError::Validation("missing form field: file".to_string()))?;
    let repo = require_field(repo, "repo")?;
    let tag = require_field(tag, "tag")?;

    // A digest that does not parse can never match the uploaded content,
    // so it gets the same integrity rejection as a well-formed mismatch.
    let expected_digest = input_digest
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ContentDigest::from_hex)
        .transpose()
        .map_err(|e| AppError::Integrity(format!("invalid inputDigest: {e}")))?;

    let outcome = push_artifact(
        state.store.as_ref(),
        &repo,
        &tag,
        &file_path,
        expected_digest.as_ref(),
    )
    .await?;

    Ok(Json(PushResponse {
        oci_response: outcome.descriptor,
        file_sha256_digest: outcome.digest.to_hex(),
        compressed: outcome.compressed,
        compression_stats: outcome.compression_stats,
    }))
}

/// Query parameters for `GET /pull`.
#[derive(Debug, Deserialize)]
pub struct PullParams {
    pub repo: String,
    pub tag: String,
}

async fn pull(
    State(state): State<AppState>,
    Query(params): Query<PullParams>,
) -> Result<Response, AppError> {
    if params.repo.trim().is_empty() {
        return Err(AppError::Validation("repo must be non-empty".to_string()));
    }
    if params.tag.trim().is_empty() {
        return Err(AppError::Validation("tag must be non-empty".to_string()));
    }

    let artifact = pull_artifact(state.store.as_ref(), &params.repo, &params.tag).await?;

    let filename = format!("{}{}", params.tag, artifact.extension);
    let headers = [
        (header::CONTENT_TYPE, artifact.media_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        ),
    ];
    Ok((headers, artifact.bytes).into_response())
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read {name} field: {e}")))
}

fn require_field(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("missing form field: {name}")))
}

/// Strip any directory components from a client-supplied filename.
fn sanitize_file_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or("artifact.bin")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("sbom.json"), "sbom.json");
        assert_eq!(sanitize_file_name("a/b/sbom.json"), "sbom.json");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
    }

    #[test]
    fn sanitize_rejects_degenerate_names() {
        assert_eq!(sanitize_file_name(""), "artifact.bin");
        assert_eq!(sanitize_file_name(".."), "artifact.bin");
    }

    #[test]
    fn require_field_trims_and_rejects_empty() {
        assert_eq!(require_field(Some(" r ".into()), "repo").unwrap(), "r");
        assert!(require_field(Some("  ".into()), "repo").is_err());
        assert!(require_field(None, "repo").is_err());
    }
}
