//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `VISIBLE_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8081)
//! - `VISIBLE_ASSETS_DIR` - Compiled widget HTML and static assets (default: assets)
//! - `VISIBLE_WIDGET_SRC_DIR` - Widget sources, searched for the device dataset (default: src)
//! - `VISIBLE_DEVICES_DATA_PATH` - Explicit device dataset path, checked first
//! - `VISIBLE_WIDGET_BASE_URL`, `VISIBLE_ASSET_BASE_URL`, `WIDGET_BASE_URL`,
//!   `ASSET_BASE_URL`, `BASE_URL` - Public base URL the widget iframes are
//!   served from; the first non-blank one wins
//!   (default: `http://127.0.0.1:<PORT>/assets`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Environment variables consulted for the asset base URL, in priority order.
pub const ASSET_BASE_URL_VARS: &[&str] = &[
    "VISIBLE_WIDGET_BASE_URL",
    "VISIBLE_ASSET_BASE_URL",
    "WIDGET_BASE_URL",
    "ASSET_BASE_URL",
    "BASE_URL",
];

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8081";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// MCP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding compiled widget HTML and static assets
    pub assets_dir: PathBuf,
    /// Directory holding widget sources (dataset fallback locations)
    pub widget_src_dir: PathBuf,
    /// Explicit device dataset path
    pub devices_data_path: Option<PathBuf>,
    /// Public base URL for widget assets, without a trailing slash
    pub asset_base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get_or_default("VISIBLE_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VISIBLE_HOST".to_string(), e.to_string()))?;
        let port = get_or_default("PORT", DEFAULT_PORT)
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let asset_base_url = resolve_asset_base_url(&lookup, port)?;

        Ok(Self {
            host,
            port,
            assets_dir: PathBuf::from(get_or_default("VISIBLE_ASSETS_DIR", "assets")),
            widget_src_dir: PathBuf::from(get_or_default("VISIBLE_WIDGET_SRC_DIR", "src")),
            devices_data_path: non_blank(lookup("VISIBLE_DEVICES_DATA_PATH")).map(PathBuf::from),
            asset_base_url,
            sentry_dsn: non_blank(lookup("SENTRY_DSN")),
            sentry_environment: non_blank(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Resolve the public asset base URL.
///
/// The first variable in [`ASSET_BASE_URL_VARS`] with a non-blank value wins;
/// trailing slashes are removed. Falls back to the local asset route.
fn resolve_asset_base_url(
    lookup: &impl Fn(&str) -> Option<String>,
    port: u16,
) -> Result<String, ConfigError> {
    for key in ASSET_BASE_URL_VARS {
        let Some(value) = non_blank(lookup(key)) else {
            continue;
        };
        let trimmed = value.trim_end_matches('/').to_string();
        Url::parse(&trimmed)
            .map_err(|e| ConfigError::InvalidEnvVar((*key).to_string(), e.to_string()))?;
        return Ok(trimmed);
    }
    Ok(format!("http://127.0.0.1:{port}/assets"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8081");
        assert_eq!(config.asset_base_url, "http://127.0.0.1:8081/assets");
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.widget_src_dir, PathBuf::from("src"));
        assert!(config.devices_data_path.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_default_asset_url_follows_port() {
        let config = config_from(&[("PORT", "9000")]).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.asset_base_url, "http://127.0.0.1:9000/assets");
    }

    #[test]
    fn test_asset_base_url_priority() {
        let config = config_from(&[
            ("BASE_URL", "https://fallback.example.com"),
            ("WIDGET_BASE_URL", "https://widgets.example.com/assets/"),
            ("VISIBLE_WIDGET_BASE_URL", "   "),
        ])
        .unwrap();
        assert_eq!(config.asset_base_url, "https://widgets.example.com/assets");
    }

    #[test]
    fn test_invalid_asset_base_url() {
        let err = config_from(&[("ASSET_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ASSET_BASE_URL"));
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "PORT"));
    }

    #[test]
    fn test_blank_dataset_path_ignored() {
        let config = config_from(&[("VISIBLE_DEVICES_DATA_PATH", "  ")]).unwrap();
        assert!(config.devices_data_path.is_none());

        let config = config_from(&[("VISIBLE_DEVICES_DATA_PATH", "/data/devices.json")]).unwrap();
        assert_eq!(
            config.devices_data_path,
            Some(PathBuf::from("/data/devices.json"))
        );
    }
}
