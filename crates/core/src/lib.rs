//! Visible Core - Device catalog types and filter engine.
//!
//! This crate provides the shared catalog logic used by:
//! - `server` - MCP/HTTP service exposing the catalog to conversational agents
//! - `cli` - Offline tools for running filters and validating datasets
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no HTTP, no file
//! system access. Datasets are handed in as already-read JSON text or as
//! decoded [`Device`] records.
//!
//! # Modules
//!
//! - [`types`] - Device records, prices and filter criteria
//! - [`catalog`] - The immutable, once-built device catalog and color index
//! - [`filter`] - Keyword tables, query inference, coercion and the filter engine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod filter;
pub mod types;

pub use catalog::{Catalog, CatalogError, ColorIndex};
pub use filter::{AppliedFilters, FilterReport, MAX_FILTER_RESULTS, SORTED_BY};
pub use types::*;
