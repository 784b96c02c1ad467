//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, trace, warn};

use super::layout::detect_text_tables;
use super::{PageSource, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::models::page::PageInput;

/// Page separator emitted by pdf-extract between pages.
const FORM_FEED: char = '\u{c}';

/// PDF page reader.
///
/// Text is read per page with lopdf; when lopdf yields nothing for every
/// page, the whole document goes through pdf-extract instead.
pub struct PdfExtractor {
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    /// Read pages from in-memory PDF data.
    pub fn read_bytes(&self, data: &[u8]) -> Result<Vec<PageInput>> {
        let (doc, raw_data) = load_document(data)?;

        let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(PdfError::NoPages);
        }
        if self.config.max_pages > 0 {
            page_numbers.truncate(self.config.max_pages);
        }

        let mut texts: Vec<String> = page_numbers
            .iter()
            .map(|&n| match guarded(|| doc.extract_text(&[n])) {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    trace!("lopdf could not read page {}: {}", n, e);
                    String::new()
                }
                Err(e) => {
                    warn!("lopdf failed on page {}: {}", n, e);
                    String::new()
                }
            })
            .collect();

        if texts.iter().all(|t| t.trim().is_empty()) {
            debug!("No text from lopdf, falling back to pdf-extract");
            texts = fallback_page_texts(&raw_data, page_numbers.len())?;
        }

        let pages: Vec<PageInput> = texts
            .into_iter()
            .map(|text| {
                let tables = if self.config.detect_text_tables {
                    detect_text_tables(&text, self.config.min_table_columns)
                } else {
                    Vec::new()
                };
                PageInput { text, tables }
            })
            .collect();

        debug!(
            "Read {} pages ({} text tables)",
            pages.len(),
            pages.iter().map(|p| p.tables.len()).sum::<usize>()
        );

        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}

impl PageSource for PdfExtractor {
    fn read_pages(&self, path: &Path) -> Result<Vec<PageInput>> {
        let data = std::fs::read(path)?;
        self.read_bytes(&data)
    }
}

/// Load a PDF, decrypting documents protected by an empty password.
///
/// Returns the document and the bytes pdf-extract should read.
fn load_document(data: &[u8]) -> Result<(Document, Vec<u8>)> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    if !doc.is_encrypted() {
        return Ok((doc, data.to_vec()));
    }

    if doc.decrypt("").is_err() {
        return Err(PdfError::Encrypted);
    }
    debug!("Decrypted PDF with empty password");

    let mut decrypted = Vec::new();
    doc.save_to(&mut decrypted)
        .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;

    Ok((doc, decrypted))
}

/// Whole-document extraction split back into pages on form feeds.
fn fallback_page_texts(raw_data: &[u8], page_count: usize) -> Result<Vec<String>> {
    // pdf-extract and its font parser panic on some fonts
    let text = guarded(|| pdf_extract::extract_text_from_mem(raw_data))?
        .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

    let mut pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
    if pages.len() < page_count {
        warn!(
            "Could not split extracted text into {} pages, keeping it on page 1",
            page_count
        );
        let mut single = vec![text];
        single.resize(page_count, String::new());
        return Ok(single);
    }

    pages.truncate(page_count);
    Ok(pages)
}

/// Run a text extraction call, turning a panic into an extraction error.
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| PdfError::TextExtraction(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("extractor panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("extractor panicked: {}", s)
    } else {
        "extractor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_a_parse_error() {
        let result = PdfExtractor::default().read_bytes(b"definitely not a pdf");

        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_extractor_panic_becomes_an_error() {
        let result: Result<String> = guarded(|| panic!("unsupported glyph"));

        match result {
            Err(PdfError::TextExtraction(message)) => {
                assert_eq!(message, "extractor panicked: unsupported glyph");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(guarded(|| 7).unwrap(), 7);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = PdfExtractor::default().read_pages(Path::new("/nonexistent/policy.pdf"));

        assert!(matches!(result, Err(PdfError::Read(_))));
    }
}
