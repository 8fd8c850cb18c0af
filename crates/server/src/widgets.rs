//! Widget registry: the interactive presentation surfaces the host renders.
//!
//! Each widget is an HTML fragment compiled ahead of time into the assets
//! directory. Markup is read once at startup and served verbatim through
//! `resources/read`; tool results reference the widget by template URI and
//! by an iframe URL under the public asset base URL.

use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

/// MIME type the host expects for widget markup.
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

/// Identifier of the filtered-devices widget.
pub const FILTER_DEVICES_WIDGET_ID: &str = "filter-devices-widget";

/// Domains the widget iframes may connect to.
const CSP_CONNECT_DOMAINS: &[&str] = &[
    "https://www.visible.com",
    "https://*.a.run.app",
    "https://*.googleusercontent.com",
    "https://visible-mcp-server-python-*.a.run.app",
];

/// Domains the widget iframes may load resources from.
const CSP_RESOURCE_DOMAINS: &[&str] = &[
    "https://visible.com",
    "https://*.visible.com",
    "https://visible.scene7.com",
    "https://*.scene7.com",
    "https://*.oaiusercontent.com",
    "https://*.oaistatic.com",
    "https://cdn.tailwindcss.com",
    "https://cdn.jsdelivr.net",
    "https://unpkg.com",
    "https://threejs.org",
    "https://*.a.run.app",
    "https://*.googleusercontent.com",
];

/// Errors that can occur while loading widget markup.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(
        "Widget HTML for \"{asset}\" not found in {dir}. Build the widget assets before starting the server."
    )]
    MarkupNotFound { asset: String, dir: String },

    #[error("Failed to read widget HTML {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Static description of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSpec {
    pub identifier: &'static str,
    pub title: &'static str,
    pub template_uri: &'static str,
    /// Status line while the tool runs.
    pub invoking: &'static str,
    /// Status line once the tool has run.
    pub invoked: &'static str,
    pub response_text: &'static str,
    /// Base name of the compiled HTML file in the assets directory.
    pub asset_name: &'static str,
}

/// Widgets exposed as display tools, in listing order.
pub const DISPLAY_WIDGETS: [WidgetSpec; 2] = [
    WidgetSpec {
        identifier: "visible-plans",
        title: "Show Visible Plans",
        template_uri: "ui://widget/visible-plans.html",
        invoking: "Loading Visible plans",
        invoked: "Displayed Visible plans",
        response_text: "Displayed Visible mobile plans in a carousel!",
        asset_name: "visible-plans",
    },
    WidgetSpec {
        identifier: "visible-devices",
        title: "Show Visible Devices",
        template_uri: "ui://widget/visible-devices.html",
        invoking: "Loading Visible devices",
        invoked: "Displayed Visible devices",
        response_text: "Displayed Visible devices in a carousel!",
        asset_name: "visible-devices",
    },
];

/// Widget rendering `filter-devices` results.
pub const FILTER_DEVICES_WIDGET: WidgetSpec = WidgetSpec {
    identifier: FILTER_DEVICES_WIDGET_ID,
    title: "Filtered Devices",
    template_uri: "ui://widget/visible-filter-devices.html",
    invoking: "Filtering Visible devices...",
    invoked: "Displayed filtered device results",
    response_text: "Here are your filtered devices!",
    asset_name: "visible-filter-devices",
};

/// A widget with its markup loaded.
#[derive(Debug, Clone)]
pub struct Widget {
    pub spec: WidgetSpec,
    pub html: String,
}

impl Widget {
    /// Description used for resource listings.
    #[must_use]
    pub fn resource_description(&self) -> String {
        format!("{} widget markup", self.spec.title)
    }

    /// `_meta` block attached to tool and resource descriptors and to tool
    /// results for this widget.
    #[must_use]
    pub fn descriptor_meta(&self) -> Value {
        json!({
            "openai/outputTemplate": self.spec.template_uri,
            "openai/toolInvocation/invoking": self.spec.invoking,
            "openai/toolInvocation/invoked": self.spec.invoked,
            "openai/widgetAccessible": true,
            "openai/resultCanProduceWidget": true,
            "openai/widgetCSP": {
                "connect_domains": CSP_CONNECT_DOMAINS,
                "resource_domains": CSP_RESOURCE_DOMAINS,
            },
        })
    }
}

/// All widgets, loaded once at startup.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    display: Vec<Widget>,
    filter: Widget,
    asset_base_url: String,
}

impl WidgetRegistry {
    /// Load every widget's markup from `assets_dir`.
    ///
    /// # Errors
    ///
    /// Returns `WidgetError` if any widget's HTML is missing or unreadable.
    pub fn load(assets_dir: &Path, asset_base_url: &str) -> Result<Self, WidgetError> {
        Self::build(asset_base_url, |spec| load_widget_html(assets_dir, spec.asset_name))
    }

    /// Build a registry with markup supplied by `markup`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `markup`.
    pub fn build(
        asset_base_url: &str,
        mut markup: impl FnMut(&WidgetSpec) -> Result<String, WidgetError>,
    ) -> Result<Self, WidgetError> {
        let mut load = |spec: WidgetSpec| -> Result<Widget, WidgetError> {
            let html = markup(&spec)?;
            tracing::debug!(widget = spec.identifier, bytes = html.len(), "Loaded widget markup");
            Ok(Widget { spec, html })
        };

        let display = DISPLAY_WIDGETS
            .into_iter()
            .map(&mut load)
            .collect::<Result<Vec<_>, _>>()?;
        let filter = load(FILTER_DEVICES_WIDGET)?;

        Ok(Self {
            display,
            filter,
            asset_base_url: asset_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Display widgets, in listing order.
    #[must_use]
    pub fn display_widgets(&self) -> &[Widget] {
        &self.display
    }

    /// The filtered-devices widget.
    #[must_use]
    pub const fn filter_widget(&self) -> &Widget {
        &self.filter
    }

    /// Every widget: display widgets first, then the filter widget.
    pub fn all(&self) -> impl Iterator<Item = &Widget> {
        self.display.iter().chain(std::iter::once(&self.filter))
    }

    #[must_use]
    pub fn by_id(&self, identifier: &str) -> Option<&Widget> {
        self.all().find(|w| w.spec.identifier == identifier)
    }

    #[must_use]
    pub fn by_uri(&self, uri: &str) -> Option<&Widget> {
        self.all().find(|w| w.spec.template_uri == uri)
    }

    /// Public iframe URL: the asset base URL plus the template's file name.
    #[must_use]
    pub fn iframe_url(&self, widget: &Widget) -> String {
        let file = widget
            .spec
            .template_uri
            .rsplit('/')
            .next()
            .unwrap_or(widget.spec.template_uri);
        format!("{}/{file}", self.asset_base_url)
    }
}

/// Read `<asset_name>.html`, or the last `<asset_name>-*.html` by name when
/// only hashed builds exist.
fn load_widget_html(assets_dir: &Path, asset_name: &str) -> Result<String, WidgetError> {
    let exact = assets_dir.join(format!("{asset_name}.html"));
    let path = if exact.is_file() {
        exact
    } else {
        let prefix = format!("{asset_name}-");
        let mut hashed: Vec<_> = std::fs::read_dir(assets_dir)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.file_name()
                            .and_then(|name| name.to_str())
                            .is_some_and(|name| {
                                name.starts_with(&prefix)
                                    && name.ends_with(".html")
                            })
                    })
                    .collect()
            })
            .unwrap_or_default();
        hashed.sort();
        hashed.pop().ok_or_else(|| WidgetError::MarkupNotFound {
            asset: asset_name.to_string(),
            dir: assets_dir.display().to_string(),
        })?
    };

    std::fs::read_to_string(&path).map_err(|source| WidgetError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registry() -> WidgetRegistry {
        WidgetRegistry::build("https://cdn.example.com/assets/", |spec| {
            Ok(format!("<div id=\"{}\"></div>", spec.identifier))
        })
        .unwrap()
    }

    #[test]
    fn test_all_lists_display_then_filter() {
        let registry = registry();
        let ids: Vec<_> = registry.all().map(|w| w.spec.identifier).collect();
        assert_eq!(
            ids,
            vec!["visible-plans", "visible-devices", "filter-devices-widget"]
        );
    }

    #[test]
    fn test_lookup_by_id_and_uri() {
        let registry = registry();
        assert_eq!(
            registry.by_id("visible-devices").unwrap().spec.title,
            "Show Visible Devices"
        );
        assert_eq!(
            registry
                .by_uri("ui://widget/visible-filter-devices.html")
                .unwrap()
                .spec
                .identifier,
            FILTER_DEVICES_WIDGET_ID
        );
        assert!(registry.by_id("visible-phones").is_none());
    }

    #[test]
    fn test_iframe_url() {
        let registry = registry();
        assert_eq!(
            registry.iframe_url(registry.filter_widget()),
            "https://cdn.example.com/assets/visible-filter-devices.html"
        );
    }

    #[test]
    fn test_descriptor_meta() {
        let registry = registry();
        let meta = registry.filter_widget().descriptor_meta();

        assert_eq!(
            meta["openai/outputTemplate"],
            "ui://widget/visible-filter-devices.html"
        );
        assert_eq!(
            meta["openai/toolInvocation/invoking"],
            "Filtering Visible devices..."
        );
        assert_eq!(meta["openai/widgetAccessible"], true);
        assert_eq!(
            meta["openai/widgetCSP"]["connect_domains"][0],
            "https://www.visible.com"
        );
    }

    #[test]
    fn test_load_prefers_exact_then_latest_hashed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("visible-plans.html"), "plans").unwrap();
        std::fs::write(dir.path().join("visible-devices-1a2b.html"), "old").unwrap();
        std::fs::write(dir.path().join("visible-devices-9f8e.html"), "new").unwrap();
        std::fs::write(dir.path().join("visible-filter-devices.html"), "filter").unwrap();

        let registry = WidgetRegistry::load(dir.path(), "http://127.0.0.1:8081/assets").unwrap();
        assert_eq!(registry.by_id("visible-plans").unwrap().html, "plans");
        assert_eq!(registry.by_id("visible-devices").unwrap().html, "new");
        assert_eq!(registry.filter_widget().html, "filter");
    }

    #[test]
    fn test_load_missing_markup_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("visible-plans.html"), "plans").unwrap();

        let err = WidgetRegistry::load(dir.path(), "http://127.0.0.1:8081/assets").unwrap_err();
        assert!(matches!(
            err,
            WidgetError::MarkupNotFound { ref asset, .. } if asset == "visible-devices"
        ));
    }
}
