//! # oas-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the artifact service.
//! Binds to a configurable port (default 8083).

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use oas_api::AppState;
use oas_registry::{OciRegistryStore, RegistryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Registry credentials are validated before the listener binds, so a
    // misconfigured deployment fails at startup instead of per request.
    let config = RegistryConfig::from_env().map_err(|e| {
        tracing::error!("registry configuration invalid: {e}");
        e
    })?;
    let store = OciRegistryStore::new(&config)?;
    let state = AppState::new(Arc::new(store));

    let port: u16 = std::env::var("OAS_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8083);

    let app = oas_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("artifact service listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
