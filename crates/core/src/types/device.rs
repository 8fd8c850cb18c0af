//! Device records as supplied by the catalog dataset.
//!
//! Records are decoded leniently: every descriptive field is optional, scalar
//! values are accepted where text is expected, and fields this crate does not
//! know about (ids, links, images) are kept verbatim so they can be echoed
//! back to callers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Availability value marking a device as purchasable right now.
pub const IN_STOCK: &str = "in_stock";

/// A device from the catalog dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Condition such as "new" or "used".
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Free-form storage size, e.g. "128 GB".
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    /// Stock state; only the literal [`IN_STOCK`] counts as available.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    /// List price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    /// Sale price, preferred over the list price when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Money>,
    /// Fields not interpreted by the filter engine.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A monetary amount as it appears in the dataset (`{"value": 199.0, ...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Money {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PriceValue>,
    /// Currency and any other price metadata.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw price value. Datasets carry both numbers and numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
    Other(Value),
}

impl PriceValue {
    /// Whether the value counts as set. Zero, empty text and empty
    /// containers do not.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Other(Value::Null) => false,
            Self::Other(Value::Bool(b)) => *b,
            Self::Other(Value::Array(items)) => !items.is_empty(),
            Self::Other(Value::Object(fields)) => !fields.is_empty(),
            Self::Other(_) => true,
        }
    }

    /// Numeric amount, if the value can be read as one.
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

impl Money {
    /// Create a price with just a numeric value.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        Self {
            value: Some(PriceValue::Number(value)),
            extra: Map::new(),
        }
    }

    fn set_value(&self) -> Option<&PriceValue> {
        self.value.as_ref().filter(|value| value.is_set())
    }
}

impl Device {
    /// Effective price: the sale price when set, otherwise the list price.
    ///
    /// A zero sale price counts as unset, a zero list price does not. A set
    /// sale price that cannot be read as a number yields `None`; it does not
    /// fall back to the list price.
    #[must_use]
    pub fn effective_price(&self) -> Option<f64> {
        let sale = self.sale_price.as_ref().and_then(Money::set_value);
        let list = self.price.as_ref().and_then(|money| money.value.as_ref());
        sale.or(list)?.amount()
    }

    /// Whether the device is currently purchasable.
    #[must_use]
    pub fn is_in_stock(&self) -> bool {
        self.availability.as_deref() == Some(IN_STOCK)
    }

    /// Title, or an empty string when the record has none.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Product category and category joined by a space, skipping missing parts.
    #[must_use]
    pub fn category_blob(&self) -> String {
        [self.product_category.as_deref(), self.category.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Accept strings, numbers and booleans as text; null becomes `None`.
/// Arrays and objects are ignored rather than failing the whole record.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
