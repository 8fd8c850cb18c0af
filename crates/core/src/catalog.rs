//! The device catalog and its derived color index.
//!
//! A [`Catalog`] is built once per process from the dataset and never
//! mutated afterwards, so it can be shared by reference across any number of
//! concurrent requests.

use thiserror::Error;
use tracing::debug;

use crate::types::Device;

/// Errors that can occur while decoding a device dataset.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dataset is not a JSON array of device records.
    #[error("invalid device dataset: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Known device colors, lowercase to original casing.
///
/// Entries keep the order in which each color first appears in the dataset.
/// Query inference scans them in this order and stops at the first hit, so
/// the order is part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorIndex {
    entries: Vec<(String, String)>,
}

impl ColorIndex {
    /// Build the index from device records.
    ///
    /// Colors are trimmed; blank colors are skipped and the first casing seen
    /// for a given lowercase color wins.
    pub fn build<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for device in devices {
            let color = device.color.as_deref().unwrap_or_default().trim();
            if color.is_empty() {
                continue;
            }
            let lowered = color.to_lowercase();
            if !entries.iter().any(|(known, _)| *known == lowered) {
                entries.push((lowered, color.to_string()));
            }
        }
        Self { entries }
    }

    /// Iterate `(lowercase, original)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(lowered, original)| (lowered.as_str(), original.as_str()))
    }

    /// First indexed color contained in `lowered_text`, in original casing.
    #[must_use]
    pub fn first_mentioned_in(&self, lowered_text: &str) -> Option<&str> {
        self.iter()
            .find(|(lowered, _)| !lowered.is_empty() && lowered_text.contains(lowered))
            .map(|(_, original)| original)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable in-memory device catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    devices: Vec<Device>,
    colors: ColorIndex,
}

impl Catalog {
    /// Build a catalog and its color index from decoded devices.
    #[must_use]
    pub fn new(devices: Vec<Device>) -> Self {
        let colors = ColorIndex::build(&devices);
        debug!(
            devices = devices.len(),
            colors = colors.len(),
            "Catalog built"
        );
        Self { devices, colors }
    }

    /// Decode a catalog from the dataset's JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Decode` if the text is not a JSON array of
    /// device objects.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let devices: Vec<Device> = serde_json::from_str(text)?;
        Ok(Self::new(devices))
    }

    /// All devices in dataset order.
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Color index derived from the devices.
    #[must_use]
    pub const fn colors(&self) -> &ColorIndex {
        &self.colors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
