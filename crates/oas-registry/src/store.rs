//! # ArtifactStore: Capability Trait for the Remote Store
//!
//! The seam between the transfer pipeline and the registry protocol. The
//! pipeline is generic over this trait so tests inject
//! [`crate::MemoryStore`] and production wires [`crate::OciRegistryStore`].

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use oas_core::Descriptor;

use crate::error::StoreError;

/// The remote artifact store collaborator.
///
/// Contract:
/// - `push` packages one file as an artifact manifest and uploads it
///   atomically under `tag`; annotation key/value pairs must survive the
///   round trip unmodified.
/// - `pull` materializes the tagged artifact's single file into the
///   caller's scoped destination directory. Exactly one file per artifact
///   is an invariant of this pipeline; stores reject anything else with
///   [`StoreError::InvalidArtifact`].
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload the file at `file_path` as a single-layer artifact tagged
    /// `repo:tag`, returning the layer descriptor the registry recorded.
    async fn push(
        &self,
        repo: &str,
        tag: &str,
        media_type: &str,
        file_path: &Path,
        annotations: BTreeMap<String, String>,
    ) -> Result<Descriptor, StoreError>;

    /// Materialize the single file of `repo:tag` into `dest_dir` and return
    /// its descriptor (including any stored annotations).
    async fn pull(&self, repo: &str, tag: &str, dest_dir: &Path) -> Result<Descriptor, StoreError>;
}
