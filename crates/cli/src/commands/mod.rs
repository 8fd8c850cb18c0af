//! Subcommand implementations.

pub mod check;
pub mod colors;
pub mod filter;

use std::path::Path;

use thiserror::Error;
use visible_core::Catalog;
use visible_mcp_server::catalog::{CatalogLoadError, load_catalog, load_catalog_file};
use visible_mcp_server::config::{ConfigError, ServerConfig};
use visible_mcp_server::state::StartupError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load `data` if given, else the dataset the server would use.
fn open_catalog(data: Option<&Path>) -> Result<Catalog, CliError> {
    match data {
        Some(path) => Ok(load_catalog_file(path)?),
        None => Ok(load_catalog(&ServerConfig::from_env()?)?),
    }
}
