//! The filter engine: merges criteria, matches devices, sorts and truncates.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, ColorIndex};
use crate::types::{Device, FilterCriteria};

use super::inference::infer_filters;
use super::keywords;

/// Maximum number of devices returned for one request.
pub const MAX_FILTER_RESULTS: usize = 6;

/// Sort order reported back to callers.
pub const SORTED_BY: &str = "price_asc";

/// Merge explicit criteria with criteria inferred from `query`.
///
/// Explicit fields override inferred ones. A non-empty `query` is kept on
/// the result so it can be echoed back, and `in_stock` defaults to `true`.
#[must_use]
pub fn merge_criteria(
    explicit: FilterCriteria,
    query: Option<&str>,
    colors: &ColorIndex,
) -> FilterCriteria {
    let inferred = infer_filters(query, colors);
    let mut merged = explicit.or(inferred);

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        merged.query = Some(query.to_string());
    }
    if merged.in_stock.is_none() {
        merged.in_stock = Some(true);
    }

    debug!(?merged, "Merged filters");
    merged
}

/// Predicates compiled from one set of criteria.
///
/// Filter values are trimmed and lowercased once up front; a predicate with
/// no value accepts every device.
#[derive(Debug, Clone)]
pub struct DeviceMatcher {
    in_stock_required: bool,
    brand_terms: Vec<String>,
    condition: Option<String>,
    color: Option<String>,
    size: Option<String>,
    category: Option<String>,
    max_price: Option<f64>,
}

impl DeviceMatcher {
    #[must_use]
    pub fn new(criteria: &FilterCriteria) -> Self {
        let mut brand_terms = Vec::new();
        if let Some(brand) = normalize(criteria.brand.as_deref()) {
            let synonym = keywords::brand_synonym(&brand).filter(|s| *s != brand);
            brand_terms.push(brand);
            brand_terms.extend(synonym.map(String::from));
        }

        Self {
            in_stock_required: criteria.requires_in_stock(),
            brand_terms,
            condition: normalize(criteria.condition.as_deref()),
            color: normalize(criteria.color.as_deref()),
            size: normalize(criteria.size.as_deref()),
            category: normalize(criteria.category.as_deref()),
            max_price: criteria.max_price,
        }
    }

    /// Whether `device` passes every active predicate.
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        if self.in_stock_required && !device.is_in_stock() {
            return false;
        }

        if !self.brand_terms.is_empty() {
            let brand = lowered(device.brand.as_deref());
            let title = lowered(device.title.as_deref());
            if !self
                .brand_terms
                .iter()
                .any(|term| brand.contains(term.as_str()) || title.contains(term.as_str()))
            {
                return false;
            }
        }

        if !equals(self.condition.as_deref(), device.condition.as_deref())
            || !equals(self.color.as_deref(), device.color.as_deref())
            || !equals(self.size.as_deref(), device.size.as_deref())
        {
            return false;
        }

        if self.category.as_ref().is_some_and(|category| {
            !device.category_blob().to_lowercase().contains(category.as_str())
        }) {
            return false;
        }

        if let Some(max_price) = self.max_price {
            match device.effective_price() {
                Some(price) if price <= max_price => {}
                _ => return false,
            }
        }

        true
    }
}

/// Apply merged criteria to the catalog.
///
/// Returns matching devices ordered by effective price (cheapest first,
/// unpriced devices last, ties in dataset order), truncated to
/// [`MAX_FILTER_RESULTS`]. Empty criteria yield no devices: filtering is
/// opt-in and never dumps the whole catalog.
#[must_use]
pub fn apply_filters<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Vec<&'a Device> {
    if criteria.is_empty() {
        debug!("Apply device filters skipped: no filters provided");
        return Vec::new();
    }

    let matcher = DeviceMatcher::new(criteria);
    let mut matched: Vec<&Device> = catalog
        .devices()
        .iter()
        .filter(|device| {
            let keep = matcher.matches(device);
            if keep {
                debug!(title = device.title(), "Device matched");
            }
            keep
        })
        .collect();

    // `sort_by` is stable, so equal prices keep dataset order.
    matched.sort_by(|a, b| compare_prices(a.effective_price(), b.effective_price()));
    matched.truncate(MAX_FILTER_RESULTS);

    let titles: Vec<&str> = matched.iter().map(|d| d.title()).collect();
    debug!(count = matched.len(), ?titles, "Filtered devices");
    matched
}

/// Effective filters echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilters {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    pub sorted_by: &'static str,
    pub limit: usize,
}

/// Outcome of one filter request.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport<'a> {
    pub filters: AppliedFilters,
    pub count: usize,
    pub results: Vec<&'a Device>,
}

impl FilterReport<'_> {
    /// Human-readable count summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Found {} matching devices.", self.count)
    }
}

/// Run a complete filter request against the catalog.
///
/// `explicit` holds the caller's already-coerced fields; `query` is the
/// optional free-text hint.
#[must_use]
pub fn run_filter<'a>(
    catalog: &'a Catalog,
    explicit: FilterCriteria,
    query: Option<&str>,
) -> FilterReport<'a> {
    let merged = merge_criteria(explicit, query, catalog.colors());
    let results = apply_filters(catalog, &merged);

    FilterReport {
        filters: AppliedFilters {
            criteria: merged,
            sorted_by: SORTED_BY,
            limit: MAX_FILTER_RESULTS,
        },
        count: results.len(),
        results,
    }
}

/// Ascending by price with unpriced devices after every priced one.
fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn normalize(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn lowered(field: Option<&str>) -> String {
    field.unwrap_or_default().trim().to_lowercase()
}

/// Case-insensitive equality; a missing filter value matches anything.
fn equals(filter: Option<&str>, field: Option<&str>) -> bool {
    filter.is_none_or(|wanted| lowered(field) == wanted)
}
