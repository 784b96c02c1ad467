//! Error types for the ipx-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ipx library.
#[derive(Error, Debug)]
pub enum IpxError {
    /// The input document does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the document input collaborators.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// A page dump could not be decoded.
    #[error("invalid page dump: {0}")]
    PageDump(String),

    /// Reading the document from disk failed.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),
}

/// Errors related to field extraction.
///
/// Extraction never fails a parse; these surface only through the
/// lookup helpers that callers may use directly.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A field name outside the taxonomy was requested.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Result type for the ipx library.
pub type Result<T> = std::result::Result<T, IpxError>;
