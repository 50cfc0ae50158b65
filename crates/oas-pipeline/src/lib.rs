//! # oas-pipeline: Compression-Aware Transfer Pipeline
//!
//! Drives the end-to-end upload (push) and download (pull) flows between
//! clients and the remote artifact store, adding transparent content-aware
//! zstd compression and end-to-end SHA-256 integrity verification.
//!
//! ## Stage Order
//!
//! Push: buffer → checksum → sniff → compression policy → package → store.
//! Pull: fetch → compression detection (annotations, then magic bytes) →
//! decompress → re-sniff → serve.
//!
//! ## Correctness Contracts
//!
//! - Bytes out == bytes in: the digest is computed over original bytes and
//!   is invariant to whether compression occurs.
//! - Compression is an optimization, never a correctness requirement:
//!   engine failures degrade to pass-through and are logged.
//! - Corrupt stored payloads are never served; decode failures abort.
//! - Every request-scoped temporary resource is released on every exit
//!   path, including early aborts (`TempDir`/Drop ownership).

pub mod compress;
pub mod error;
pub mod policy;
pub mod pull;
pub mod push;
pub mod sniff;

pub use error::PipelineError;
pub use pull::{pull_artifact, PulledArtifact};
pub use push::{push_artifact, PushOutcome};
