//! Core library for insurance document field extraction.
//!
//! This crate provides:
//! - Document input (PDF text via lopdf/pdf-extract, JSON page dumps)
//! - Pattern extraction of currency, dates, percentages and identifiers
//! - Keyword-based field labeling with confidence scores
//! - Table interpretation and document-level field resolution

pub mod error;
pub mod models;
pub mod pdf;
pub mod policy;

pub use error::{IpxError, Result};
pub use models::config::IpxConfig;
pub use models::page::{PageInput, Table};
pub use models::policy::{
    DocumentType, ExtractedField, ExtractionResult, FieldMap, FieldName, FieldValue, TableRecord,
    TableType,
};
pub use pdf::{PageSource, PdfExtractor};
pub use policy::{DocumentParser, InsuranceParser};
