//! # oas-api: Axum HTTP Surface for the Artifact Service
//!
//! Exposes the compression-aware transfer pipeline over HTTP.
//!
//! ## API Surface
//!
//! | Route                | Module                 | Purpose                 |
//! |----------------------|------------------------|-------------------------|
//! | `POST /push`         | [`routes::transfer`]   | Multipart upload        |
//! | `GET /pull`          | [`routes::transfer`]   | Download, restored form |
//! | `GET /health`        | `lib.rs`               | Liveness probe          |
//!
//! ## Crate Policy
//!
//! - No pipeline logic in handlers; they parse, delegate, and map errors.
//! - All errors map to structured HTTP responses via [`AppError`].
//! - Registry configuration is validated in `main` before the listener
//!   binds, so `/health` reflects a service that can actually serve.

pub mod error;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Maximum accepted upload size. Artifacts are buffered in full for
/// checksumming, so this also bounds per-request memory and disk.
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::transfer::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe. Configuration is validated before startup, so a serving
/// process is a healthy one.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "health": "OK" }))
}
