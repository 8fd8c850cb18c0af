//! Filter criteria applied to the device catalog for one request.

use serde::{Deserialize, Serialize};

/// Normalized set of constraints for one filter request.
///
/// Every field is optional; a field with no value places no constraint on
/// the result. Criteria are built per request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Upper bound on the effective price, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Require `availability == "in_stock"`. Treated as `true` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// Free-text hint. Only consumed by inference, never matched directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl FilterCriteria {
    /// True when no field carries a value, including `in_stock` and `query`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.max_price.is_none()
            && self.condition.is_none()
            && self.color.is_none()
            && self.size.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
            && self.query.is_none()
    }

    /// Fill every unset field of `self` from `fallback`.
    ///
    /// Used to layer explicit caller fields over fields inferred from the
    /// free-text query: values already present in `self` always win.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            brand: self.brand.or(fallback.brand),
            max_price: self.max_price.or(fallback.max_price),
            condition: self.condition.or(fallback.condition),
            color: self.color.or(fallback.color),
            size: self.size.or(fallback.size),
            category: self.category.or(fallback.category),
            in_stock: self.in_stock.or(fallback.in_stock),
            query: self.query.or(fallback.query),
        }
    }

    /// Whether in-stock availability is required.
    #[must_use]
    pub fn requires_in_stock(&self) -> bool {
        self.in_stock.unwrap_or(true)
    }
}
