//! Device dataset loading.
//!
//! The dataset is read and decoded exactly once, at startup. Failing to find
//! or decode it is fatal: without a catalog no filter request can be served.

use std::path::{Path, PathBuf};

use thiserror::Error;
use visible_core::{Catalog, CatalogError};

use crate::config::ServerConfig;

/// Errors that can occur while loading the device dataset.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Devices dataset not found. Checked: {checked}")]
    NotFound { checked: String },

    #[error("Failed to read devices dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode devices dataset {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// Dataset looked up relative to the working directory as a last resort.
const WORKING_DIR_DATASET: &str = "filter_devices.json";

/// Candidate dataset locations, in the order they are checked.
#[must_use]
pub fn dataset_candidates(config: &ServerConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(5);
    if let Some(path) = &config.devices_data_path {
        candidates.push(path.clone());
    }
    candidates.extend([
        config
            .widget_src_dir
            .join("filter-devices")
            .join("filter_devices.json"),
        config
            .widget_src_dir
            .join("visible-devices")
            .join("devices.json"),
        config.assets_dir.join("visible-devices-data.json"),
        PathBuf::from(WORKING_DIR_DATASET),
    ]);
    candidates
}

/// First candidate that exists on disk.
///
/// # Errors
///
/// Returns `CatalogLoadError::NotFound` listing every checked location when
/// none exists.
pub fn resolve_dataset_path(candidates: &[PathBuf]) -> Result<PathBuf, CatalogLoadError> {
    candidates
        .iter()
        .find(|path| path.exists())
        .cloned()
        .ok_or_else(|| CatalogLoadError::NotFound {
            checked: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Read and decode a dataset file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// device records.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&text).map_err(|source| CatalogLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        devices = catalog.len(),
        colors = catalog.colors().len(),
        "Loaded devices dataset"
    );
    Ok(catalog)
}

/// Resolve the dataset location from configuration and load it.
///
/// # Errors
///
/// Returns an error if no dataset exists at any candidate location or the
/// one found cannot be loaded.
pub fn load_catalog(config: &ServerConfig) -> Result<Catalog, CatalogLoadError> {
    let path = resolve_dataset_path(&dataset_candidates(config))?;
    load_catalog_file(&path)
}
