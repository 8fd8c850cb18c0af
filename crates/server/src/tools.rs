//! MCP tools: one display tool per carousel widget plus `filter-devices`.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::instrument;
use visible_core::Catalog;
use visible_core::filter::{coerce_filters, run_filter};

use crate::mcp::types::{CallToolResult, Content, ToolAnnotations, ToolDescriptor, UiBlock};
use crate::widgets::{Widget, WidgetRegistry};

/// Name of the device filter tool.
pub const FILTER_DEVICES_TOOL: &str = "filter-devices";

const FILTER_DEVICES_TITLE: &str = "Filter Visible Devices";

const FILTER_DEVICES_DESCRIPTION: &str = "Use this when the user wants to find, search, view, sort, or compare mobile devices available from Visible, including smartphones, wearables, tablets, and accessories. The user can filter devices based on brand, price range, condition (new, used, refurbished), storage size, color, category, or availability, and refine results using natural language queries such as:
\u{201c}Show me used iPhones under $300\u{201d}
\u{201c}Find refurbished Pixels in black\u{201d}
\u{201c}Compare Samsung phones with 128GB storage\u{201d}
This tool helps customers browse Visible\u{2019}s catalog and narrow down options quickly by applying intelligent filtering to the device inventory and returning an interactive results carousel showing matching devices, along with key details such as price, condition, storage size, and purchase links.
Use this tool anytime a user expresses interest in shopping for devices, finding deals, comparing models, or bundling a device with a Visible plan.";

const CATEGORY_DESCRIPTION: &str = "Category of items to display (plans or devices).";

/// Iframe height for filter results.
const FILTER_IFRAME_HEIGHT: u32 = 500;
/// Iframe height for display carousels.
const DISPLAY_IFRAME_HEIGHT: u32 = 480;

/// Errors raised while executing a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Input validation error: {0}")]
    InvalidInput(String),

    #[error("Failed to encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// Whether the error should be reported to the agent as a tool result
    /// rather than as a protocol failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::InvalidInput(_))
    }
}

/// Arguments of `filter-devices`.
///
/// `max_price` and `in_stock` are taken as raw JSON and normalized by the
/// filter coercion step.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterDevicesInput {
    pub brand: Option<String>,
    pub max_price: Option<Value>,
    pub condition: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<Value>,
    pub query: Option<String>,
}

impl FilterDevicesInput {
    /// The structured filter fields as a raw filter object, without `query`.
    fn filter_fields(self) -> (Map<String, Value>, Option<String>) {
        let mut raw = Map::new();
        let strings = [
            ("brand", self.brand),
            ("condition", self.condition),
            ("color", self.color),
            ("size", self.size),
            ("category", self.category),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                raw.insert(key.to_string(), Value::String(value));
            }
        }
        if let Some(value) = self.max_price {
            raw.insert("max_price".to_string(), value);
        }
        if let Some(value) = self.in_stock {
            raw.insert("in_stock".to_string(), value);
        }
        (raw, self.query)
    }
}

/// Arguments of a display widget tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayWidgetInput {
    pub category: String,
}

/// Tool descriptors in listing order.
#[must_use]
pub fn tool_descriptors(widgets: &WidgetRegistry) -> Vec<ToolDescriptor> {
    let display_schema = json!({
        "type": "object",
        "properties": {
            "category": {
                "type": "string",
                "description": CATEGORY_DESCRIPTION,
            }
        },
        "required": ["category"],
        "additionalProperties": false,
    });

    let mut tools: Vec<ToolDescriptor> = widgets
        .display_widgets()
        .iter()
        .map(|widget| ToolDescriptor {
            name: widget.spec.identifier.to_string(),
            title: widget.spec.title.to_string(),
            description: widget.spec.title.to_string(),
            input_schema: display_schema.clone(),
            meta: widget.descriptor_meta(),
            annotations: ToolAnnotations::READ_ONLY,
        })
        .collect();

    tools.push(ToolDescriptor {
        name: FILTER_DEVICES_TOOL.to_string(),
        title: FILTER_DEVICES_TITLE.to_string(),
        description: FILTER_DEVICES_DESCRIPTION.to_string(),
        input_schema: filter_devices_schema(),
        meta: widgets.filter_widget().descriptor_meta(),
        annotations: ToolAnnotations::READ_ONLY,
    });
    tools
}

fn filter_devices_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "brand": {"type": "string"},
            "max_price": {"type": "number"},
            "condition": {"type": "string"},
            "color": {"type": "string"},
            "size": {"type": "string"},
            "category": {"type": "string"},
            "in_stock": {"type": "boolean"},
            "query": {"type": "string"},
        },
        "additionalProperties": false,
    })
}

/// Executes tool calls against the loaded catalog and widgets.
#[derive(Debug, Clone, Copy)]
pub struct ToolExecutor<'a> {
    catalog: &'a Catalog,
    widgets: &'a WidgetRegistry,
}

impl<'a> ToolExecutor<'a> {
    #[must_use]
    pub const fn new(catalog: &'a Catalog, widgets: &'a WidgetRegistry) -> Self {
        Self { catalog, widgets }
    }

    /// Run the named tool.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::UnknownTool` for an unregistered name,
    /// `ToolError::InvalidInput` when the arguments fail validation, and
    /// `ToolError::Encode` if the result cannot be serialized.
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub fn call(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<CallToolResult, ToolError> {
        let arguments = Value::Object(arguments.unwrap_or_default());
        tracing::debug!(%arguments, "Tool call received");

        if name == FILTER_DEVICES_TOOL {
            let input: FilterDevicesInput = decode(arguments)?;
            return self.filter_devices(input);
        }

        let widget = self
            .widgets
            .by_id(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let input: DisplayWidgetInput = decode(arguments)?;
        Ok(self.display_widget(widget, input))
    }

    fn filter_devices(&self, input: FilterDevicesInput) -> Result<CallToolResult, ToolError> {
        let (raw, query) = input.filter_fields();
        let explicit = coerce_filters(&raw);
        let report = run_filter(self.catalog, explicit, query.as_deref());

        let summary = report.summary();
        tracing::debug!(count = report.count, %summary, "Filter devices response");

        let widget = self.widgets.filter_widget();
        Ok(CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(serde_json::to_value(&report)?),
            meta: Some(widget.descriptor_meta()),
            ui: Some(self.ui_block(widget, FILTER_IFRAME_HEIGHT)),
            is_error: false,
        })
    }

    fn display_widget(&self, widget: &Widget, input: DisplayWidgetInput) -> CallToolResult {
        CallToolResult {
            content: vec![Content::text(widget.spec.response_text)],
            structured_content: Some(json!({ "category": input.category })),
            meta: Some(widget.descriptor_meta()),
            ui: Some(self.ui_block(widget, DISPLAY_IFRAME_HEIGHT)),
            is_error: false,
        }
    }

    fn ui_block(&self, widget: &Widget, height: u32) -> UiBlock {
        UiBlock::iframe(self.widgets.iframe_url(widget), widget.spec.title, height)
    }
}

fn decode<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn fixtures() -> (Catalog, WidgetRegistry) {
        let catalog = Catalog::from_json(
            r#"[
                {"title": "iPhone 13", "brand": "Apple", "condition": "Used", "color": "Black",
                 "availability": "in_stock", "price": {"value": 399}, "sale_price": {"value": 249}},
                {"title": "Pixel 7", "brand": "Google", "condition": "Used", "color": "Black",
                 "availability": "in_stock", "price": {"value": 299}},
                {"title": "iPhone 15", "brand": "Apple", "condition": "New", "color": "Blue",
                 "availability": "out_of_stock", "price": {"value": 799}}
            ]"#,
        )
        .unwrap();
        let widgets = WidgetRegistry::build("https://cdn.example.com/assets", |spec| {
            Ok(format!("<div>{}</div>", spec.identifier))
        })
        .unwrap();
        (catalog, widgets)
    }

    fn args(value: Value) -> Option<Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_descriptors_order_and_annotations() {
        let (_, widgets) = fixtures();
        let tools = tool_descriptors(&widgets);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["visible-plans", "visible-devices", "filter-devices"]);

        let filter = &tools[2];
        assert_eq!(filter.title, "Filter Visible Devices");
        assert!(filter.description.starts_with("Use this when the user wants to find"));
        assert_eq!(filter.input_schema["additionalProperties"], false);
        assert!(filter.input_schema.get("required").is_none());

        let value = serde_json::to_value(&tools[0]).unwrap();
        assert_eq!(value["inputSchema"]["required"], json!(["category"]));
        assert_eq!(
            value["annotations"],
            json!({"destructiveHint": false, "openWorldHint": false, "readOnlyHint": true})
        );
        assert_eq!(
            value["_meta"]["openai/outputTemplate"],
            "ui://widget/visible-plans.html"
        );
    }

    #[test]
    fn test_filter_devices_result() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let result = executor
            .call(FILTER_DEVICES_TOOL, args(json!({"brand": "iphone"})))
            .unwrap();

        assert!(!result.is_error);
        assert_eq!(result.content, vec![Content::text("Found 1 matching devices.")]);
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["count"], 1);
        assert_eq!(structured["results"][0]["title"], "iPhone 13");
        assert_eq!(
            structured["filters"],
            json!({"brand": "iphone", "in_stock": true, "sorted_by": "price_asc", "limit": 6})
        );

        let ui = result.ui.unwrap();
        assert_eq!(ui.height, 500);
        assert_eq!(ui.title, "Filtered Devices");
        assert_eq!(ui.url, "https://cdn.example.com/assets/visible-filter-devices.html");
    }

    #[test]
    fn test_filter_devices_query_and_loose_scalars() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let result = executor
            .call(
                FILTER_DEVICES_TOOL,
                args(json!({"query": "used phone in black", "max_price": " 260 ", "in_stock": "yes"})),
            )
            .unwrap();

        let structured = result.structured_content.unwrap();
        assert_eq!(structured["filters"]["max_price"], 260.0);
        assert_eq!(structured["filters"]["query"], "used phone in black");
        assert_eq!(structured["count"], 1);
        assert_eq!(structured["results"][0]["title"], "iPhone 13");
    }

    #[test]
    fn test_filter_devices_rejects_unknown_field() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let err = executor
            .call(FILTER_DEVICES_TOOL, args(json!({"model": "13"})))
            .unwrap_err();
        assert!(err.is_user_facing());
        assert!(err.to_string().starts_with("Input validation error: "));
    }

    #[test]
    fn test_filter_devices_rejects_non_string_brand() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let err = executor
            .call(FILTER_DEVICES_TOOL, args(json!({"brand": 5})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_display_widget_result() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let result = executor
            .call("visible-plans", args(json!({"category": "plans"})))
            .unwrap();

        assert_eq!(
            result.content,
            vec![Content::text("Displayed Visible mobile plans in a carousel!")]
        );
        assert_eq!(result.structured_content, Some(json!({"category": "plans"})));
        let ui = result.ui.unwrap();
        assert_eq!(ui.height, 480);
        assert_eq!(ui.url, "https://cdn.example.com/assets/visible-plans.html");
    }

    #[test]
    fn test_display_widget_requires_category() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        assert!(matches!(
            executor.call("visible-devices", None).unwrap_err(),
            ToolError::InvalidInput(_)
        ));
        assert!(matches!(
            executor
                .call("visible-devices", args(json!({"category": "devices", "extra": 1})))
                .unwrap_err(),
            ToolError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_unknown_tool() {
        let (catalog, widgets) = fixtures();
        let executor = ToolExecutor::new(&catalog, &widgets);

        let err = executor.call("visible-phones", None).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: visible-phones");
    }
}
