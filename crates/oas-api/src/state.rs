//! # Application State
//!
//! Shared state for the Axum application. The store is held behind the
//! [`ArtifactStore`] trait so handlers are agnostic to whether they talk to
//! a real registry or the in-memory store used in tests.

use std::sync::Arc;

use oas_registry::ArtifactStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The artifact store backing push and pull.
    pub store: Arc<dyn ArtifactStore>,
}

impl AppState {
    /// Create application state over the given store.
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }
}
