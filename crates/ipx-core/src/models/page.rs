//! Materialized page content handed to the extraction engine.

use serde::{Deserialize, Serialize};

/// A table as a grid of optional text cells. The first row is the header.
pub type Table = Vec<Vec<Option<String>>>;

/// Text and tables of one document page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    /// Extracted page text (may be empty).
    #[serde(default)]
    pub text: String,

    /// Tables found on the page.
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl PageInput {
    /// Create a page from text only.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tables: Vec::new(),
        }
    }

    /// Attach a table to the page.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

/// Build a table from string rows, mapping empty cells to `None`.
pub fn table_from_rows<R, C>(rows: R) -> Table
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| {
                    let cell = cell.as_ref().trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect()
        })
        .collect()
}
