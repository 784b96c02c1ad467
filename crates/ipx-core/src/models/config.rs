//! Configuration structures for the extraction pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration for the ipx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpxConfig {
    /// Document reading configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Document reading configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Detect whitespace-aligned tables in page text.
    pub detect_text_tables: bool,

    /// Minimum number of columns for a text line to count as a table row.
    pub min_table_columns: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            detect_text_tables: true,
            min_table_columns: 2,
        }
    }
}

/// Field extraction thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Characters of context kept on each side of a currency match.
    pub currency_context_radius: usize,

    /// Characters of context kept on each side of any other match.
    pub context_radius: usize,

    /// Context score a currency candidate must exceed.
    pub currency_min_context: f64,

    /// Confidence a currency candidate must exceed.
    pub currency_min_confidence: f64,

    /// Context score a percentage candidate must exceed.
    pub percentage_min_context: f64,

    /// GST amounts below this are treated as noise.
    pub gst_noise_floor: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_context_radius: 50,
            context_radius: 30,
            currency_min_context: 0.35,
            currency_min_confidence: 0.5,
            percentage_min_context: 0.45,
            gst_noise_floor: 50.0,
        }
    }
}

impl IpxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
