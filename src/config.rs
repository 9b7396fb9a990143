use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::error::Result;
use crate::data::model::SeriesClass;

/// Configuration for reading OceanView exports.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "header_scan_lines": 60, "fallback_class": "spectrum" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// How many leading lines are searched for the `Date:` header.
    pub header_scan_lines: usize,
    /// Output class used when the caller asks for a non-spectrum class.
    pub fallback_class: SeriesClass,
    /// Unit of the wavelength axis.
    pub wavelength_unit: String,
    /// Unit of the relative time axis.
    pub time_unit: String,
    /// Unit of the intensity field.
    pub intensity_unit: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            header_scan_lines: 40,
            fallback_class: SeriesClass::OpticalSpectrum,
            wavelength_unit: "nm".to_string(),
            time_unit: "s".to_string(),
            intensity_unit: "a.u.".to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
