//! Core types for the Visible catalog.
//!
//! This module provides the device record as it appears in the dataset and
//! the normalized filter criteria derived per request.

pub mod criteria;
pub mod device;

pub use criteria::FilterCriteria;
pub use device::{Device, IN_STOCK, Money, PriceValue};
