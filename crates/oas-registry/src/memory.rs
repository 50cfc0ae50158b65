//! # In-Memory Artifact Store
//!
//! `ArtifactStore` implementation backed by a `HashMap`, with no persistence,
//! no network. Used by the pipeline and API tests, and handy for local
//! development without registry credentials.
//!
//! Tests can read [`MemoryStore::push_count`] to assert that a rejected
//! request never reached the store, and mutate stored descriptors via
//! [`MemoryStore::strip_annotations`] to simulate artifacts pushed by
//! out-of-band tools that do not speak the annotation contract.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use oas_core::descriptor::ANNOTATION_TITLE;
use oas_core::Descriptor;

use crate::error::StoreError;
use crate::store::ArtifactStore;

#[derive(Debug, Clone)]
struct StoredArtifact {
    descriptor: Descriptor,
    file_name: String,
    bytes: Vec<u8>,
}

/// In-memory artifact store keyed by `(repo, tag)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Mutex<HashMap<(String, String), StoredArtifact>>,
    push_calls: Mutex<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of push calls that reached this store.
    pub fn push_count(&self) -> usize {
        *self.push_calls.lock().expect("push counter poisoned")
    }

    /// Drop all annotations from a stored artifact's descriptor, simulating
    /// a push performed by a tool outside this pipeline.
    pub fn strip_annotations(&self, repo: &str, tag: &str) {
        let mut artifacts = self.artifacts.lock().expect("store poisoned");
        if let Some(stored) = artifacts.get_mut(&(repo.to_string(), tag.to_string())) {
            stored.descriptor.annotations = None;
        }
    }

    /// Raw stored bytes for `(repo, tag)`, if present.
    pub fn stored_bytes(&self, repo: &str, tag: &str) -> Option<Vec<u8>> {
        let artifacts = self.artifacts.lock().expect("store poisoned");
        artifacts
            .get(&(repo.to_string(), tag.to_string()))
            .map(|a| a.bytes.clone())
    }

    /// Stored descriptor for `(repo, tag)`, if present.
    pub fn stored_descriptor(&self, repo: &str, tag: &str) -> Option<Descriptor> {
        let artifacts = self.artifacts.lock().expect("store poisoned");
        artifacts
            .get(&(repo.to_string(), tag.to_string()))
            .map(|a| a.descriptor.clone())
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn push(
        &self,
        repo: &str,
        tag: &str,
        media_type: &str,
        file_path: &Path,
        annotations: BTreeMap<String, String>,
    ) -> Result<Descriptor, StoreError> {
        *self.push_calls.lock().expect("push counter poisoned") += 1;

        let bytes = tokio::fs::read(file_path).await?;
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(tag)
            .to_string();

        let mut annotations = annotations;
        annotations.insert(ANNOTATION_TITLE.to_string(), file_name.clone());

        let descriptor = Descriptor {
            media_type: media_type.to_string(),
            digest: format!("sha256:{}", hex::encode(Sha256::digest(&bytes))),
            size: bytes.len() as u64,
            annotations: Some(annotations),
        };

        let mut artifacts = self.artifacts.lock().expect("store poisoned");
        artifacts.insert(
            (repo.to_string(), tag.to_string()),
            StoredArtifact {
                descriptor: descriptor.clone(),
                file_name,
                bytes,
            },
        );
        Ok(descriptor)
    }

    async fn pull(&self, repo: &str, tag: &str, dest_dir: &Path) -> Result<Descriptor, StoreError> {
        let stored = {
            let artifacts = self.artifacts.lock().expect("store poisoned");
            artifacts
                .get(&(repo.to_string(), tag.to_string()))
                .cloned()
                .ok_or_else(|| StoreError::NotFound {
                    repo: repo.to_string(),
                    tag: tag.to_string(),
                })?
        };

        tokio::fs::write(dest_dir.join(&stored.file_name), &stored.bytes).await?;
        Ok(stored.descriptor)
    }
}
