//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Liveness check
//! POST /mcp             - MCP JSON-RPC endpoint
//! GET  /mcp             - 405, no server-initiated stream
//! GET  /assets/{*path}  - Compiled widget assets
//! ```

pub mod assets;
pub mod health;
pub mod mcp;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Build all routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/mcp", get(mcp::event_stream).post(mcp::handle))
        .merge(assets::routes(&state.config().assets_dir))
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
