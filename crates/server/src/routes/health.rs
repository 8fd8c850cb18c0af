//! Liveness check.

use axum::Json;
use serde_json::{Value, json};

use crate::mcp::types::SERVER_NAME;

/// Returns a fixed status body. Does not inspect the catalog; it is loaded
/// before the listener is bound.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": SERVER_NAME }))
}
