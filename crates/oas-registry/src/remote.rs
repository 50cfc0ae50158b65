//! # OCI Registry Store: reqwest Client for the Distribution API
//!
//! Minimal OCI distribution flow for single-file artifacts: monolithic blob
//! uploads, an OCI image manifest per artifact, tag-addressed pulls. The
//! manifest carries exactly one layer; that layer's descriptor is where the
//! compression provenance annotations live.
//!
//! ## Error Handling
//!
//! HTTP errors are mapped to [`StoreError`] with the endpoint, status, and
//! response body excerpt. Retries are NOT built in; a failed push or pull
//! is terminal for the request that issued it.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use oas_core::descriptor::ANNOTATION_TITLE;
use oas_core::Descriptor;

use crate::config::RegistryConfig;
use crate::error::StoreError;
use crate::store::ArtifactStore;

const MANIFEST_MEDIA_TYPE: &str = "application/vnd.oci.image.manifest.v1+json";
const EMPTY_CONFIG_MEDIA_TYPE: &str = "application/vnd.oci.empty.v1+json";

/// The empty JSON config blob mandated by the OCI artifact guidance.
const EMPTY_CONFIG_BLOB: &[u8] = b"{}";

/// OCI image manifest, restricted to the fields this service produces and
/// consumes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    schema_version: u32,
    media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifact_type: Option<String>,
    config: Descriptor,
    layers: Vec<Descriptor>,
}

/// Remote artifact store backed by an OCI distribution registry.
///
/// Holds a `reqwest::Client` plus the base URL and credentials from
/// [`RegistryConfig`]. `Send + Sync`, designed to be shared via `Arc`.
#[derive(Debug)]
pub struct OciRegistryStore {
    client: reqwest::Client,
    base_url: String,
    username: String,
    token: String,
}

impl OciRegistryStore {
    /// Create a store from registry configuration.
    pub fn new(config: &RegistryConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::Http {
                endpoint: config.base_url(),
                source: e,
            })?;
        Ok(Self {
            client,
            base_url: config.base_url(),
            username: config.username.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request with registry credentials attached, mapping transport
    /// errors to [`StoreError::Http`].
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, StoreError> {
        request
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })
    }

    /// Fail with [`StoreError::Api`] unless the response status matches.
    async fn expect_status(
        response: reqwest::Response,
        expected: &[u16],
        endpoint: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status().as_u16();
        if expected.contains(&status) {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            endpoint: endpoint.to_string(),
            status,
            body: body.chars().take(512).collect(),
        })
    }

    /// Upload one blob monolithically: open an upload session, then PUT the
    /// bytes with the digest. Returns the blob's `sha256:<hex>` digest.
    async fn upload_blob(&self, repo: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let digest = format!("sha256:{}", hex::encode(Sha256::digest(bytes)));

        let start_endpoint = format!("/v2/{repo}/blobs/uploads/");
        let response = self
            .send(self.client.post(self.url(&start_endpoint)), &start_endpoint)
            .await?;
        let response = Self::expect_status(response, &[202], &start_endpoint).await?;

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Api {
                endpoint: start_endpoint.clone(),
                status: 202,
                body: "upload session response missing Location header".into(),
            })?;

        // Location may be absolute or registry-relative; it may also already
        // carry session query parameters.
        let mut upload_url = if location.starts_with("http://") || location.starts_with("https://")
        {
            location.to_string()
        } else {
            self.url(location)
        };
        upload_url.push(if upload_url.contains('?') { '&' } else { '?' });
        upload_url.push_str("digest=");
        upload_url.push_str(&digest);

        let put_endpoint = format!("/v2/{repo}/blobs/uploads/ (PUT)");
        let response = self
            .send(
                self.client
                    .put(&upload_url)
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .body(bytes.to_vec()),
                &put_endpoint,
            )
            .await?;
        Self::expect_status(response, &[201], &put_endpoint).await?;

        Ok(digest)
    }
}

#[async_trait]
impl ArtifactStore for OciRegistryStore {
    async fn push(
        &self,
        repo: &str,
        tag: &str,
        media_type: &str,
        file_path: &Path,
        annotations: BTreeMap<String, String>,
    ) -> Result<Descriptor, StoreError> {
        let bytes = tokio::fs::read(file_path).await?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(tag)
            .to_string();

        tracing::debug!(repo, tag, media_type, size = bytes.len(), "pushing artifact");

        let layer_digest = self.upload_blob(repo, &bytes).await?;
        let config_digest = self.upload_blob(repo, EMPTY_CONFIG_BLOB).await?;

        let mut layer_annotations = annotations;
        layer_annotations.insert(ANNOTATION_TITLE.to_string(), file_name);

        let layer = Descriptor {
            media_type: media_type.to_string(),
            digest: layer_digest,
            size: bytes.len() as u64,
            annotations: Some(layer_annotations),
        };

        let manifest = Manifest {
            schema_version: 2,
            media_type: MANIFEST_MEDIA_TYPE.to_string(),
            artifact_type: Some(artifact_type_of(media_type)),
            config: Descriptor {
                media_type: EMPTY_CONFIG_MEDIA_TYPE.to_string(),
                digest: config_digest,
                size: EMPTY_CONFIG_BLOB.len() as u64,
                annotations: None,
            },
            layers: vec![layer.clone()],
        };

        let endpoint = format!("/v2/{repo}/manifests/{tag}");
        let body = serde_json::to_vec(&manifest).map_err(|e| {
            StoreError::InvalidArtifact(format!("manifest serialization failed: {e}"))
        })?;
        let response = self
            .send(
                self.client
                    .put(self.url(&endpoint))
                    .header(reqwest::header::CONTENT_TYPE, MANIFEST_MEDIA_TYPE)
                    .body(body),
                &endpoint,
            )
            .await?;
        Self::expect_status(response, &[201], &endpoint).await?;

        Ok(layer)
    }

    async fn pull(&self, repo: &str, tag: &str, dest_dir: &Path) -> Result<Descriptor, StoreError> {
        let endpoint = format!("/v2/{repo}/manifests/{tag}");
        let response = self
            .send(
                self.client
                    .get(self.url(&endpoint))
                    .header(reqwest::header::ACCEPT, MANIFEST_MEDIA_TYPE),
                &endpoint,
            )
            .await?;
        if response.status().as_u16() == 404 {
            return Err(StoreError::NotFound {
                repo: repo.to_string(),
                tag: tag.to_string(),
            });
        }
        let response = Self::expect_status(response, &[200], &endpoint).await?;
        let manifest: Manifest = response.json().await.map_err(|e| StoreError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let layer = single_layer(manifest.layers)?;

        let blob_endpoint = format!("/v2/{repo}/blobs/{}", layer.digest);
        let response = self
            .send(self.client.get(self.url(&blob_endpoint)), &blob_endpoint)
            .await?;
        let response = Self::expect_status(response, &[200], &blob_endpoint).await?;
        let bytes = response.bytes().await.map_err(|e| StoreError::Http {
            endpoint: blob_endpoint,
            source: e,
        })?;

        let file_name = safe_file_name(layer.annotation(ANNOTATION_TITLE), tag);
        tokio::fs::write(dest_dir.join(&file_name), &bytes).await?;

        tracing::debug!(repo, tag, size = bytes.len(), "pulled artifact");
        Ok(layer)
    }
}

/// Enforce the single-file invariant: this pipeline stores exactly one
/// layer per artifact. Anything else was pushed by a different tool.
fn single_layer(layers: Vec<Descriptor>) -> Result<Descriptor, StoreError> {
    match <[Descriptor; 1]>::try_from(layers) {
        Ok([layer]) => Ok(layer),
        Err(layers) => Err(StoreError::InvalidArtifact(format!(
            "expected exactly 1 layer, manifest has {}",
            layers.len()
        ))),
    }
}

/// Reduce a manifest-supplied title to a bare file name.
///
/// Titles on artifacts pushed by other tools are untrusted input: a title
/// carrying directory components (or an absolute path, which `Path::join`
/// would substitute for the base) must never steer the write outside the
/// caller's scoped destination directory. Degenerate titles fall back to
/// the tag.
fn safe_file_name(title: Option<&str>, tag: &str) -> String {
    title
        .map(Path::new)
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .unwrap_or(tag)
        .to_string()
}

/// Strip media type parameters (e.g. `text/plain; charset=utf-8` →
/// `text/plain`): an OCI `artifactType` must be a bare media type per
/// RFC 6838.
fn artifact_type_of(media_type: &str) -> String {
    match media_type.find(';') {
        Some(idx) => media_type[..idx].trim().to_string(),
        None => media_type.to_string(),
    }
}
