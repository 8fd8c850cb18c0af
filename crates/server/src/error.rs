//! Unified error handling for HTTP handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::mcp::jsonrpc::{INTERNAL_ERROR, JsonRpcResponse, RpcError};

/// Application-level error type for the MCP server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A JSON-RPC message that could not be handled at the transport level.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Method not supported on this route.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Rpc(ref e) if e.code == INTERNAL_ERROR) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "MCP request error"
            );
        }

        match self {
            // Unparseable messages still get a JSON-RPC envelope.
            Self::Rpc(error) => (
                if error.code == INTERNAL_ERROR {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::BAD_REQUEST
                },
                Json(JsonRpcResponse::failure(Value::Null, error)),
            )
                .into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::MethodNotAllowed(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, self.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("ui://widget/x.html".to_string());
        assert_eq!(err.to_string(), "Not found: ui://widget/x.html");

        let err = AppError::Rpc(RpcError::parse_error("EOF while parsing a value"));
        assert_eq!(
            err.to_string(),
            "JSON-RPC error -32700: Parse error: EOF while parsing a value"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::MethodNotAllowed("GET".to_string())),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            get_status(AppError::Rpc(RpcError::parse_error("eof"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Rpc(RpcError::internal("encode"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
