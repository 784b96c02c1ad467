//! Document input: turns files into materialized pages.

mod dump;
mod extractor;
pub mod layout;

pub use dump::{PageDump, PageDumpReader};
pub use extractor::PdfExtractor;

use std::path::Path;

use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::models::page::PageInput;

/// Result type for document input operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Kind of input document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A PDF file.
    Pdf,
    /// A JSON page dump.
    PageDump,
}

impl InputKind {
    /// `.json` files are page dumps; everything else is read as PDF.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputKind::PageDump,
            _ => InputKind::Pdf,
        }
    }
}

/// Source of page text and tables.
pub trait PageSource {
    /// Read every page of the document at `path`, in page order.
    fn read_pages(&self, path: &Path) -> Result<Vec<PageInput>>;
}

/// Page source for a path.
pub fn source_for(path: &Path, config: &PdfConfig) -> Box<dyn PageSource> {
    match InputKind::from_path(path) {
        InputKind::Pdf => Box::new(PdfExtractor::new(config.clone())),
        InputKind::PageDump => Box::new(PageDumpReader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_from_extension() {
        assert_eq!(InputKind::from_path(Path::new("a/policy.pdf")), InputKind::Pdf);
        assert_eq!(InputKind::from_path(Path::new("a/policy.JSON")), InputKind::PageDump);
        assert_eq!(InputKind::from_path(Path::new("policy")), InputKind::Pdf);
    }
}
