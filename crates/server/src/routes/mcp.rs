//! MCP transport: one JSON-RPC message per POST, one JSON response back.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::mcp::{
    dispatch,
    jsonrpc::{JsonRpcRequest, RpcError},
};
use crate::state::AppState;

/// Handle a JSON-RPC message.
///
/// Notifications are acknowledged with `202 Accepted` and no body.
///
/// # Errors
///
/// Returns `AppError::Rpc` (HTTP 400) when the body is not JSON or not a
/// JSON-RPC request object.
#[instrument(skip_all, fields(bytes = body.len()))]
pub async fn handle(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request: JsonRpcRequest = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => serde_json::from_value(value).map_err(RpcError::invalid_request)?,
        Err(e) => return Err(RpcError::parse_error(e).into()),
    };

    Ok(match dispatch(&state, request) {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    })
}

/// The server never pushes messages, so there is no stream to open.
pub async fn event_stream() -> AppError {
    AppError::MethodNotAllowed("GET /mcp: this server does not open an event stream".to_string())
}
