//! JSON page dumps: pre-extracted page text and tables.
//!
//! ```json
//! {"pages": [{"text": "Policy No: ABC-123456", "tables": [[["Item", "Amount"], ["GST", null]]]}]}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::{PageSource, Result};
use crate::error::PdfError;
use crate::models::page::PageInput;

/// Serialized page content of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDump {
    pub pages: Vec<PageInput>,
}

impl PageDump {
    /// Decode a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PdfError::PageDump(e.to_string()))
    }
}

/// Reads page dumps from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageDumpReader;

impl PageSource for PageDumpReader {
    fn read_pages(&self, path: &Path) -> Result<Vec<PageInput>> {
        let json = std::fs::read_to_string(path)?;
        let dump = PageDump::from_json(&json)?;
        debug!("Loaded page dump with {} pages", dump.pages.len());
        Ok(dump.pages)
    }
}
