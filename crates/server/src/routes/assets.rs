//! Compiled widget assets.

use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, header},
    response::Response,
};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};

use crate::state::AppState;

const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Serve files under `assets_dir` at `/assets`.
///
/// `ServeDir` answers paths that climb out of the directory with 404 and
/// picks the content type from the file extension.
pub fn routes(assets_dir: &Path) -> Router<AppState> {
    Router::new()
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            cache_control,
        ))
}

/// Only successful responses are cacheable.
fn cache_control(response: &Response) -> Option<HeaderValue> {
    response
        .status()
        .is_success()
        .then(|| HeaderValue::from_static(ASSET_CACHE_CONTROL))
}
