//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;
use visible_core::Catalog;

use crate::catalog::{CatalogLoadError, load_catalog};
use crate::config::ServerConfig;
use crate::widgets::{WidgetError, WidgetRegistry};

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),

    #[error(transparent)]
    Widget(#[from] WidgetError),
}

/// Application state shared across all handlers.
///
/// Built once at startup and never mutated afterwards. Cloning is cheap via
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Catalog,
    widgets: WidgetRegistry,
}

impl AppState {
    /// Create application state from already loaded parts.
    #[must_use]
    pub fn new(config: ServerConfig, catalog: Catalog, widgets: WidgetRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                widgets,
            }),
        }
    }

    /// Load the device dataset and widget markup named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the dataset or any widget cannot be loaded.
    pub fn load(config: ServerConfig) -> Result<Self, StartupError> {
        let catalog = load_catalog(&config)?;
        let widgets = WidgetRegistry::load(&config.assets_dir, &config.asset_base_url)?;
        tracing::info!(
            devices = catalog.len(),
            widgets = widgets.all().count(),
            "Application state loaded"
        );
        Ok(Self::new(config, catalog, widgets))
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the device catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the widget registry.
    #[must_use]
    pub fn widgets(&self) -> &WidgetRegistry {
        &self.inner.widgets
    }
}
