//! # oas-registry: Remote Artifact Store Collaborator
//!
//! The transfer pipeline never speaks the OCI distribution protocol itself;
//! it consumes the [`ArtifactStore`] capability trait defined here. Two
//! implementations are provided:
//!
//! - [`remote::OciRegistryStore`]: reqwest client against a real OCI
//!   registry, configured once at startup from [`config::RegistryConfig`].
//! - [`memory::MemoryStore`]: in-memory store for tests and development.
//!
//! The store owns atomic tag semantics and manifest packing; the pipeline
//! only relies on annotations surviving the push/pull round trip and on
//! exactly one file per artifact.

pub mod config;
pub mod error;
pub mod memory;
pub mod remote;
pub mod store;

pub use config::{ConfigError, RegistryConfig};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use remote::OciRegistryStore;
pub use store::ArtifactStore;
