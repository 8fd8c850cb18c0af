//! Integration test fixtures for the Visible catalog MCP server.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p visible-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `mcp_http` - The full router driven in-process over HTTP
//! - `filter_properties` - Filter engine properties against a fixture catalog
//!
//! [`TestContext`] writes a dataset and widget markup into a temporary
//! directory and loads them through the same startup path as the server
//! binary.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::path::Path;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use visible_core::Catalog;
use visible_mcp_server::config::ServerConfig;
use visible_mcp_server::state::AppState;

/// Fixture catalog. Positions matter: the two $250 devices sit at indexes 3
/// and 4, and the last two entries carry no usable price.
pub const FIXTURE_DEVICES: &str = r#"[
    {"title": "iPhone 14", "brand": "Apple", "condition": "New", "color": "Midnight",
     "size": "128 GB", "category": "Phones", "product_category": "Smartphones",
     "availability": "in_stock", "price": {"value": 399, "currency": "USD"}},
    {"title": "Galaxy S23", "brand": "Samsung", "condition": "New", "color": "Black",
     "size": "256 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": 199}},
    {"title": "Pixel 7", "brand": "Google", "condition": "Used", "color": "Black",
     "size": "128 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": "329.00"}, "sale_price": {"value": "279.00"}},
    {"title": "Pixel 7a", "brand": "Google", "condition": "Used", "color": "Black",
     "size": "128 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": 250}},
    {"title": "Pixel 6", "brand": "Google", "condition": "Used", "color": "Black",
     "size": "128 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": 300}, "sale_price": {"value": 250}},
    {"title": "iPhone 13", "brand": "Apple", "condition": "Refurbished", "color": "Blue",
     "size": "128 GB", "category": "Phones", "availability": "out_of_stock",
     "price": {"value": 299}},
    {"title": "Galaxy Watch 6", "brand": "Samsung", "condition": "New", "color": "Silver",
     "category": "Watches", "product_category": "Wearables", "availability": "in_stock",
     "price": {"value": 149}},
    {"title": "Galaxy Tab A9", "brand": "Samsung", "condition": "New", "color": "Graphite",
     "size": "64 GB", "category": "Tablets", "availability": "in_stock",
     "price": {"value": 179}, "sale_price": {"value": 0}},
    {"title": "moto g stylus", "brand": "Motorola", "condition": "New", "color": "Black",
     "size": "128 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": 229}},
    {"title": "OnePlus 12R", "brand": "OnePlus", "condition": "New", "color": "Black",
     "size": "256 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": 499}},
    {"title": "Pixel Buds Pro", "brand": "Google", "condition": "New", "color": "Black",
     "category": "Accessories", "availability": "in_stock"},
    {"title": "Pixel Fold", "brand": "Google", "condition": "Used", "color": "Black",
     "size": "256 GB", "category": "Phones", "availability": "in_stock",
     "price": {"value": "call for price"}}
]"#;

/// The fixture catalog, decoded.
#[must_use]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_json(FIXTURE_DEVICES).expect("fixture catalog decodes")
}

/// A loaded server backed by files in a temporary directory.
pub struct TestContext {
    pub state: AppState,
    pub router: Router,
    _dir: TempDir,
}

impl TestContext {
    /// Write fixtures to disk and load them through [`AppState::load`].
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let assets = dir.path().join("assets");
        std::fs::create_dir_all(&assets).expect("create assets dir");

        write(&assets.join("visible-plans.html"), "<div id=\"plans-root\"></div>");
        write(&assets.join("visible-devices-0a1b2c.html"), "<div id=\"devices-old\"></div>");
        write(&assets.join("visible-devices-9f8e7d.html"), "<div id=\"devices-root\"></div>");
        write(
            &assets.join("visible-filter-devices.html"),
            "<div id=\"filter-root\"></div>",
        );
        write(&assets.join("visible-filter-devices.js"), "console.log('filter');");
        write(&assets.join("visible-devices-data.json"), FIXTURE_DEVICES);

        let assets_dir = assets.display().to_string();
        let src_dir = dir.path().join("src").display().to_string();
        let config = ServerConfig::from_lookup(|key| match key {
            "VISIBLE_ASSETS_DIR" => Some(assets_dir.clone()),
            "VISIBLE_WIDGET_SRC_DIR" => Some(src_dir.clone()),
            "VISIBLE_WIDGET_BASE_URL" => Some("https://widgets.example.com/assets/".to_string()),
            _ => None,
        })
        .expect("fixture config is valid");

        let state = AppState::load(config).expect("fixture state loads");
        let router = visible_mcp_server::app(state.clone());

        Self {
            state,
            router,
            _dir: dir,
        }
    }

    /// Send a request through the router and decode the body as JSON, or
    /// `Value::Null` when the body is empty or not JSON.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, headers, body)
    }

    /// POST a raw body to `/mcp`.
    pub async fn post_mcp_raw(&self, body: impl Into<Body>) -> (StatusCode, HeaderMap, Value) {
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(body.into())
            .expect("valid request");
        self.send(request).await
    }

    /// Call a JSON-RPC method and return the `result` member.
    pub async fn rpc(&self, method: &str, params: Value) -> Value {
        let message = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let (status, _, body) = self.post_mcp_raw(message.to_string()).await;
        assert_eq!(status, StatusCode::OK, "{method} returned {status}: {body}");
        assert!(body.get("error").is_none(), "{method} failed: {body}");
        body.get("result").cloned().expect("result member")
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Value) {
        let request = Request::get(uri).body(Body::empty()).expect("valid request");
        self.send(request).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).expect("write fixture file");
}
