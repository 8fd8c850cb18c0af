//! Device filtering.
//!
//! A filter request flows through three stages:
//!
//! 1. [`coerce_filters`] turns the caller's raw filter object into typed
//!    [`FilterCriteria`](crate::FilterCriteria), dropping anything malformed.
//! 2. [`infer_filters`] derives color, size, condition and brand from the
//!    free-text query using the [`keywords`] tables and the catalog's colors.
//! 3. [`run_filter`] merges both (explicit fields win), applies the criteria
//!    to the catalog and returns at most [`MAX_FILTER_RESULTS`] devices,
//!    cheapest first.

mod coerce;
mod engine;
mod inference;
pub mod keywords;

pub use coerce::{ALLOWED_FILTER_KEYS, coerce_filters};
pub use engine::{
    AppliedFilters, DeviceMatcher, FilterReport, MAX_FILTER_RESULTS, SORTED_BY, apply_filters,
    merge_criteria, run_filter,
};
pub use inference::infer_filters;
