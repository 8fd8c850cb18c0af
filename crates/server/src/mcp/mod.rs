//! Model Context Protocol request dispatch.
//!
//! The server is stateless: every JSON-RPC request is answered from the
//! shared [`AppState`] alone, and notifications are acknowledged without a
//! body.

pub mod jsonrpc;
pub mod types;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::instrument;

use crate::state::AppState;
use crate::tools::{ToolExecutor, tool_descriptors};
use crate::widgets::{WIDGET_MIME_TYPE, Widget};

use self::jsonrpc::{JsonRpcRequest, JsonRpcResponse, RpcError};
use self::types::{
    CallToolParams, CallToolResult, Implementation, InitializeParams, InitializeResult,
    LATEST_PROTOCOL_VERSION, ListResourceTemplatesResult, ListResourcesResult, ListToolsResult,
    ReadResourceParams, ReadResourceResult, ResourceDescriptor, ResourceTemplateDescriptor,
    SERVER_NAME, SUPPORTED_PROTOCOL_VERSIONS, TextResourceContents,
};

const INSTRUCTIONS: &str = "Browse Visible mobile plans and devices. Use the display tools to show \
the plan or device carousels, and filter-devices to search the device catalog by brand, price, \
condition, color, storage size, category or a free-text query.";

/// Handle one JSON-RPC message.
///
/// Returns `None` for notifications, which get no response body.
#[instrument(skip_all, fields(method = %request.method))]
pub fn dispatch(state: &AppState, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        tracing::debug!("Notification acknowledged");
        return None;
    }

    let id = request.id.unwrap_or(Value::Null);
    let outcome = handle(state, &request.method, request.params);

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => {
            tracing::warn!(code = error.code, message = %error.message, "Request failed");
            JsonRpcResponse::failure(id, error)
        }
    })
}

fn handle(state: &AppState, method: &str, params: Option<Value>) -> Result<Value, RpcError> {
    match method {
        "initialize" => to_result(&initialize(&params_or_default::<InitializeParams>(params)?)),
        "ping" => Ok(json!({})),
        "tools/list" => to_result(&ListToolsResult {
            tools: tool_descriptors(state.widgets()),
        }),
        "tools/call" => to_result(&call_tool(state, required_params(params)?)?),
        "resources/list" => to_result(&list_resources(state)),
        "resources/templates/list" => to_result(&list_resource_templates(state)),
        "resources/read" => to_result(&read_resource(state, &required_params(params)?)),
        other => Err(RpcError::method_not_found(other)),
    }
}

fn initialize(params: &InitializeParams) -> InitializeResult {
    let requested = params.protocol_version.as_deref();
    let protocol_version = requested
        .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
        .unwrap_or(LATEST_PROTOCOL_VERSION);

    tracing::info!(?requested, protocol_version, "Client initialized");

    InitializeResult {
        protocol_version: protocol_version.to_string(),
        capabilities: json!({
            "tools": { "listChanged": false },
            "resources": { "listChanged": false, "subscribe": false },
        }),
        server_info: Implementation {
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
        },
        instructions: INSTRUCTIONS.to_string(),
    }
}

fn call_tool(state: &AppState, params: CallToolParams) -> Result<CallToolResult, RpcError> {
    let executor = ToolExecutor::new(state.catalog(), state.widgets());
    match executor.call(&params.name, params.arguments) {
        Ok(result) => Ok(result),
        Err(e) if e.is_user_facing() => {
            tracing::info!(tool = %params.name, error = %e, "Tool call rejected");
            Ok(CallToolResult::error(e.to_string()))
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Tool call failed");
            Err(RpcError::internal(e))
        }
    }
}

fn list_resources(state: &AppState) -> ListResourcesResult {
    ListResourcesResult {
        resources: state
            .widgets()
            .all()
            .map(|widget| ResourceDescriptor {
                name: widget.spec.title.to_string(),
                title: widget.spec.title.to_string(),
                uri: widget.spec.template_uri.to_string(),
                description: widget.resource_description(),
                mime_type: WIDGET_MIME_TYPE,
                meta: widget.descriptor_meta(),
            })
            .collect(),
    }
}

fn list_resource_templates(state: &AppState) -> ListResourceTemplatesResult {
    ListResourceTemplatesResult {
        resource_templates: state
            .widgets()
            .all()
            .map(|widget| ResourceTemplateDescriptor {
                name: widget.spec.title.to_string(),
                title: widget.spec.title.to_string(),
                uri_template: widget.spec.template_uri.to_string(),
                description: widget.resource_description(),
                mime_type: WIDGET_MIME_TYPE,
                meta: widget.descriptor_meta(),
            })
            .collect(),
    }
}

fn read_resource(state: &AppState, params: &ReadResourceParams) -> ReadResourceResult {
    let Some(widget) = state.widgets().by_uri(&params.uri) else {
        tracing::info!(uri = %params.uri, "Unknown resource requested");
        return ReadResourceResult {
            contents: Vec::new(),
            meta: Some(json!({ "error": format!("Unknown resource: {}", params.uri) })),
        };
    };

    ReadResourceResult {
        contents: vec![widget_contents(widget)],
        meta: None,
    }
}

fn widget_contents(widget: &Widget) -> TextResourceContents {
    TextResourceContents {
        uri: widget.spec.template_uri.to_string(),
        mime_type: WIDGET_MIME_TYPE,
        text: widget.html.clone(),
        meta: widget.descriptor_meta(),
    }
}

fn required_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, RpcError> {
    let params = params.ok_or_else(|| RpcError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(RpcError::invalid_params)
}

fn params_or_default<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T, RpcError> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(params) => serde_json::from_value(params).map_err(RpcError::invalid_params),
    }
}

fn to_result(result: &impl Serialize) -> Result<Value, RpcError> {
    serde_json::to_value(result).map_err(RpcError::internal)
}
