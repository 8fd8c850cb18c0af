//! End-to-end tests of the HTTP surface: the MCP endpoint, health and assets.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use visible_integration_tests::TestContext;

// =============================================================================
// Health & middleware
// =============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let (status, headers, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "visible-mcp-server"}));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();
    let request = Request::get("/health")
        .header("x-request-id", "edge-42")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = ctx.send(request).await;

    assert_eq!(headers["x-request-id"], "edge-42");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let ctx = TestContext::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/mcp")
        .header("origin", "https://chatgpt.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = ctx.send(request).await;

    assert!(status.is_success());
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers.get("access-control-allow-credentials").is_none());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();
    let (status, headers, _) = ctx.get("/sse").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.contains_key("x-request-id"));
}

// =============================================================================
// Assets
// =============================================================================

#[tokio::test]
async fn test_asset_headers() {
    let ctx = TestContext::new();
    let (status, headers, _) = ctx.get("/assets/visible-filter-devices.js").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["cache-control"], "public, max-age=3600");
    assert!(
        headers["content-type"]
            .to_str()
            .unwrap()
            .contains("javascript")
    );
}

#[tokio::test]
async fn test_asset_missing_and_traversal() {
    let ctx = TestContext::new();

    let (status, headers, _) = ctx.get("/assets/missing.html").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get("cache-control").is_none());

    let (status, _, _) = ctx.get("/assets/../Cargo.toml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = ctx.get("/assets/%2e%2e/Cargo.toml").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// MCP transport
// =============================================================================

#[tokio::test]
async fn test_get_mcp_is_method_not_allowed() {
    let ctx = TestContext::new();
    let (status, _, _) = ctx.get("/mcp").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let ctx = TestContext::new();
    let (status, _, body) = ctx.post_mcp_raw("{\"jsonrpc\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_non_request_json_is_invalid_request() {
    let ctx = TestContext::new();
    let (status, _, body) = ctx.post_mcp_raw("[1, 2, 3]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32600);
}

#[tokio::test]
async fn test_notification_is_accepted_without_body() {
    let ctx = TestContext::new();
    let (status, _, body) = ctx
        .post_mcp_raw(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_unknown_method() {
    let ctx = TestContext::new();
    let (status, _, body) = ctx
        .post_mcp_raw(r#"{"jsonrpc": "2.0", "id": "x", "method": "sampling/createMessage"}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "x");
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_initialize() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "0"}
            }),
        )
        .await;

    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "visible-mcp-server");
    assert!(result["instructions"].as_str().unwrap().contains("filter-devices"));
}

// =============================================================================
// Tools
// =============================================================================

#[tokio::test]
async fn test_tools_list() {
    let ctx = TestContext::new();
    let result = ctx.rpc("tools/list", json!({})).await;
    let tools = result["tools"].as_array().unwrap();

    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["visible-plans", "visible-devices", "filter-devices"]);

    for tool in tools {
        assert_eq!(tool["annotations"]["readOnlyHint"], true);
        assert_eq!(tool["_meta"]["openai/widgetAccessible"], true);
    }
    assert_eq!(
        tools[2]["_meta"]["openai/outputTemplate"],
        "ui://widget/visible-filter-devices.html"
    );
    assert_eq!(
        tools[2]["inputSchema"]["properties"]["max_price"]["type"],
        "number"
    );
}

#[tokio::test]
async fn test_filter_devices_iphone() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "tools/call",
            json!({"name": "filter-devices", "arguments": {"brand": "iphone"}}),
        )
        .await;

    assert!(result.get("isError").is_none());
    assert_eq!(result["content"][0]["text"], "Found 1 matching devices.");
    let structured = &result["structuredContent"];
    assert_eq!(structured["count"], 1);
    assert_eq!(structured["results"][0]["title"], "iPhone 14");
    assert_eq!(structured["results"][0]["price"]["currency"], "USD");
    assert_eq!(structured["filters"]["in_stock"], true);
    assert_eq!(structured["filters"]["sorted_by"], "price_asc");
    assert_eq!(structured["filters"]["limit"], 6);

    assert_eq!(result["ui"]["type"], "iframe");
    assert_eq!(
        result["ui"]["url"],
        "https://widgets.example.com/assets/visible-filter-devices.html"
    );
    assert_eq!(result["ui"]["height"], 500);
    assert_eq!(
        result["_meta"]["openai/toolInvocation/invoked"],
        "Displayed filtered device results"
    );
}

#[tokio::test]
async fn test_filter_devices_query_inference() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "tools/call",
            json!({
                "name": "filter-devices",
                "arguments": {"query": "used pixel in black under $300"}
            }),
        )
        .await;

    let structured = &result["structuredContent"];
    assert_eq!(structured["filters"]["brand"], "Google");
    assert_eq!(structured["filters"]["color"], "Black");
    assert_eq!(structured["filters"]["condition"], "used");
    assert!(structured["filters"].get("max_price").is_none());
    assert_eq!(
        structured["filters"]["query"],
        "used pixel in black under $300"
    );

    let titles: Vec<_> = structured["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Pixel 7a", "Pixel 6", "Pixel 7", "Pixel Fold"]);
}

#[tokio::test]
async fn test_filter_devices_malformed_max_price_is_dropped() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "tools/call",
            json!({
                "name": "filter-devices",
                "arguments": {"brand": "samsung", "max_price": "not-a-number"}
            }),
        )
        .await;

    let structured = &result["structuredContent"];
    assert!(structured["filters"].get("max_price").is_none());
    assert_eq!(structured["count"], 3);
}

#[tokio::test]
async fn test_filter_devices_validation_error() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "tools/call",
            json!({"name": "filter-devices", "arguments": {"model": "pixel"}}),
        )
        .await;

    assert_eq!(result["isError"], true);
    assert!(
        result["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Input validation error: ")
    );
}

#[tokio::test]
async fn test_display_tool() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "tools/call",
            json!({"name": "visible-devices", "arguments": {"category": "devices"}}),
        )
        .await;

    assert_eq!(
        result["content"][0]["text"],
        "Displayed Visible devices in a carousel!"
    );
    assert_eq!(result["structuredContent"], json!({"category": "devices"}));
    assert_eq!(result["ui"]["height"], 480);
    assert_eq!(result["ui"]["title"], "Show Visible Devices");
}

#[tokio::test]
async fn test_unknown_tool() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc("tools/call", json!({"name": "visible-phones", "arguments": {}}))
        .await;

    assert_eq!(result["isError"], true);
    assert_eq!(result["content"][0]["text"], "Unknown tool: visible-phones");
}

// =============================================================================
// Resources
// =============================================================================

#[tokio::test]
async fn test_resources_read_hashed_widget() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc(
            "resources/read",
            json!({"uri": "ui://widget/visible-devices.html"}),
        )
        .await;

    let contents = &result["contents"][0];
    assert_eq!(contents["text"], "<div id=\"devices-root\"></div>");
    assert_eq!(contents["mimeType"], "text/html+skybridge");
    assert_eq!(
        contents["_meta"]["openai/outputTemplate"],
        "ui://widget/visible-devices.html"
    );
}

#[tokio::test]
async fn test_resources_read_unknown_uri() {
    let ctx = TestContext::new();
    let result = ctx
        .rpc("resources/read", json!({"uri": "ui://widget/nope.html"}))
        .await;

    assert_eq!(result["contents"], json!([]));
    assert_eq!(result["_meta"]["error"], "Unknown resource: ui://widget/nope.html");
}

#[tokio::test]
async fn test_resource_listings() {
    let ctx = TestContext::new();

    let resources = ctx.rpc("resources/list", json!({})).await;
    let uris: Vec<_> = resources["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["uri"].as_str().unwrap())
        .collect();
    assert_eq!(
        uris,
        vec![
            "ui://widget/visible-plans.html",
            "ui://widget/visible-devices.html",
            "ui://widget/visible-filter-devices.html",
        ]
    );

    let templates = ctx.rpc("resources/templates/list", json!({})).await;
    assert_eq!(
        templates["resourceTemplates"][2]["description"],
        "Filtered Devices widget markup"
    );
    assert_eq!(ctx.state.widgets().all().count(), 3);
}
