//! Filter inference from free-text queries.

use tracing::debug;

use crate::catalog::ColorIndex;
use crate::types::FilterCriteria;

use super::keywords;

/// Derive color, size, condition and brand from a free-text query.
///
/// Each field is resolved independently and the first match in table order
/// wins within a field. Colors come from the catalog's [`ColorIndex`], the
/// rest from the [`keywords`] tables. Price ceilings are never inferred.
///
/// Returns empty criteria for an absent or empty query.
#[must_use]
pub fn infer_filters(query: Option<&str>, colors: &ColorIndex) -> FilterCriteria {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        debug!("Infer filters skipped: empty query");
        return FilterCriteria::default();
    };

    let normalized = query.to_lowercase();

    let inferred = FilterCriteria {
        color: colors.first_mentioned_in(&normalized).map(String::from),
        size: keywords::size_mentioned_in(&normalized),
        condition: keywords::condition_mentioned_in(&normalized).map(String::from),
        brand: keywords::brand_mentioned_in(&normalized).map(String::from),
        ..Default::default()
    };

    debug!(query, ?inferred, "Inferred filters from query");
    inferred
}
