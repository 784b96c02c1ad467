//! Whole-document field resolution.
//!
//! Each page yields text and table candidates which are reduced into a page
//! [`FieldMap`]. Page maps are then merged into the document map in page
//! order; a value is only ever replaced by a strictly more confident one.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::IpxError;
use crate::models::config::{ExtractionConfig, IpxConfig, PdfConfig};
use crate::models::page::PageInput;
use crate::models::policy::{
    DocumentType, ExtractedField, ExtractionResult, FieldMap, FieldName, FieldValue, TableRecord,
};
use crate::pdf::{self, PageSource};
use crate::Result;

use super::context::ContextMatcher;
use super::rules::{
    Candidate, CurrencyExtractor, DateExtractor, DeclaredValueExtractor, FieldExtractor,
    PercentageExtractor, PolicyNumberExtractor, VehicleRegistrationExtractor,
};
use super::table::TableInterpreter;
use super::taxonomy::{ValueKind, AUTO_INDICATORS, HEALTH_INDICATORS, LIFE_INDICATORS};
use super::validate::{validate_currency, validate_date, validate_percentage};

/// Fields and tables found on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    pub fields: FieldMap,
    pub tables: Vec<TableRecord>,
}

/// Trait for insurance document parsing.
pub trait DocumentParser {
    /// Parse already materialized pages. Never fails.
    fn parse_pages(&self, filename: &str, pages: &[PageInput]) -> ExtractionResult;

    /// Parse a document from disk.
    ///
    /// Only a missing file is an error; unreadable documents produce a
    /// result carrying a warning.
    fn parse_file(&self, path: &Path) -> Result<ExtractionResult>;
}

/// Rule-based insurance document parser.
#[derive(Debug, Clone, Default)]
pub struct InsuranceParser {
    extraction: ExtractionConfig,
    pdf: PdfConfig,
}

impl InsuranceParser {
    /// Create a parser with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from a full configuration.
    pub fn from_config(config: &IpxConfig) -> Self {
        Self {
            extraction: config.extraction.clone(),
            pdf: config.pdf.clone(),
        }
    }

    /// Set extraction thresholds.
    pub fn with_extraction_config(mut self, config: ExtractionConfig) -> Self {
        self.extraction = config;
        self
    }

    /// Set document reading options.
    pub fn with_pdf_config(mut self, config: PdfConfig) -> Self {
        self.pdf = config;
        self
    }

    /// Parse the document at `path` with an explicit page source.
    pub fn parse_with_source(
        &self,
        path: &Path,
        source: &dyn PageSource,
    ) -> Result<ExtractionResult> {
        if !path.exists() {
            return Err(IpxError::InputNotFound(path.to_path_buf()));
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match source.read_pages(path) {
            Ok(mut pages) => {
                if self.pdf.max_pages > 0 {
                    pages.truncate(self.pdf.max_pages);
                }
                Ok(self.parse_pages(&filename, &pages))
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                let mut result = ExtractionResult::empty(filename);
                result.warnings.push(format!("Error processing PDF: {}", e));
                Ok(result)
            }
        }
    }

    /// Extract fields and tables from a single page.
    pub fn extract_page(&self, page_no: u32, page: &PageInput) -> PageExtraction {
        let mut candidates = self.text_fields(&page.text, page_no);
        let mut tables = Vec::new();

        let interpreter =
            TableInterpreter::new().with_gst_noise_floor(self.extraction.gst_noise_floor);
        for table in &page.tables {
            if let Some(interpreted) = interpreter.interpret(table, page_no) {
                candidates.extend(interpreted.fields);
                tables.push(interpreted.record);
            }
        }

        PageExtraction {
            fields: candidates.into_iter().collect(),
            tables,
        }
    }

    /// Labeled text candidates of one page, in discovery order.
    fn text_fields(&self, text: &str, page: u32) -> Vec<(FieldName, ExtractedField)> {
        let mut fields = Vec::new();
        if text.trim().is_empty() {
            return fields;
        }

        let radius = self.extraction.context_radius;
        let currency_radius = self.extraction.currency_context_radius;
        let everything = ContextMatcher::all();

        // policy number: first accepted match only
        for c in PolicyNumberExtractor::new().with_radius(radius).extract_all(text) {
            if let Some(score) = identifier_score(&everything, &c, FieldName::PolicyNumber) {
                fields.push(field(FieldName::PolicyNumber, c, 0.8 + 0.2 * score, page));
                break;
            }
        }

        for c in VehicleRegistrationExtractor::new().with_radius(radius).extract_all(text) {
            if let Some(score) = identifier_score(&everything, &c, FieldName::VehicleRegistration) {
                fields.push(field(FieldName::VehicleRegistration, c, 0.75 + 0.2 * score, page));
                break;
            }
        }

        let date_matcher = ContextMatcher::for_kind(ValueKind::Date);
        for c in DateExtractor::new().with_radius(radius).extract_all(text) {
            let Some(m) = date_matcher.match_field(&c.context) else {
                continue;
            };
            let factor = if validate_date(&c.value).is_valid { 0.9 } else { 0.5 };
            fields.push(field(m.field, c, m.score * factor, page));
        }

        let currency_matcher = ContextMatcher::for_kind(ValueKind::Currency);
        for c in CurrencyExtractor::new().with_radius(currency_radius).extract_all(text) {
            let Some(m) = currency_matcher.match_field(&c.context) else {
                continue;
            };
            if m.score <= self.extraction.currency_min_context {
                continue;
            }
            if m.field == FieldName::GstAmount && c.value < self.extraction.gst_noise_floor {
                debug!("Discarding GST amount {} below noise floor", c.value);
                continue;
            }

            let bonus = if validate_currency(c.value, m.field).is_valid { 0.1 } else { 0.0 };
            let confidence = (0.4 + 0.5 * m.score + bonus).min(1.0);
            if confidence > self.extraction.currency_min_confidence {
                fields.push(field(m.field, c, confidence, page));
            }
        }

        let idv_matcher = ContextMatcher::only(FieldName::Idv);
        for c in DeclaredValueExtractor::new().with_radius(currency_radius).extract_all(text) {
            let score = idv_matcher.match_field(&c.context).map_or(0.0, |m| m.score);
            let bonus = if validate_currency(c.value, FieldName::Idv).is_valid { 0.1 } else { 0.0 };
            let confidence = (0.6 + 0.3 * score + bonus).min(1.0);
            fields.push(field(FieldName::Idv, c, confidence, page));
        }

        let percentage_matcher = ContextMatcher::for_kind(ValueKind::Percentage);
        for c in PercentageExtractor::new().with_radius(radius).extract_all(text) {
            let Some(m) = percentage_matcher.match_field(&c.context) else {
                continue;
            };
            if m.score <= self.extraction.percentage_min_context {
                continue;
            }
            let factor = if validate_percentage(c.value).is_valid { 0.9 } else { 0.5 };
            fields.push(field(m.field, c, m.score * factor, page));
        }

        fields
    }
}

impl DocumentParser for InsuranceParser {
    fn parse_pages(&self, filename: &str, pages: &[PageInput]) -> ExtractionResult {
        let start = Instant::now();
        let mut result = ExtractionResult::empty(filename);
        result.document_metadata.pages = pages.len();

        info!("Parsing {} ({} pages)", filename, pages.len());

        for (page_no, page) in (1u32..).zip(pages) {
            let extraction = self.extract_page(page_no, page);
            debug!(
                "Page {}: {} fields, {} tables",
                page_no,
                extraction.fields.len(),
                extraction.tables.len()
            );

            result.fields.absorb(extraction.fields, &mut result.warnings);
            result.tables_extracted.extend(extraction.tables);
        }

        result.document_metadata.document_type = classify_document(&result.fields);

        info!(
            "Extracted {} fields from {} as {} in {} ms",
            result.fields.len(),
            filename,
            result.document_metadata.document_type,
            start.elapsed().as_millis()
        );

        result
    }

    fn parse_file(&self, path: &Path) -> Result<ExtractionResult> {
        let source = pdf::source_for(path, &self.pdf);
        self.parse_with_source(path, source.as_ref())
    }
}

/// Classify a document from the set of fields it contains.
pub fn classify_document(fields: &FieldMap) -> DocumentType {
    let has_any = |indicators: &[FieldName]| indicators.iter().any(|f| fields.contains(*f));

    if has_any(AUTO_INDICATORS) {
        DocumentType::AutoInsurance
    } else if has_any(LIFE_INDICATORS) {
        DocumentType::LifeInsurance
    } else if has_any(HEALTH_INDICATORS) {
        DocumentType::HealthInsurance
    } else {
        DocumentType::GeneralInsurance
    }
}

/// Context score for an identifier. The candidate is accepted when its own
/// keywords occur in the context, or when no keyword of any field does.
fn identifier_score<T>(
    everything: &ContextMatcher,
    candidate: &Candidate<T>,
    expected: FieldName,
) -> Option<f64> {
    match ContextMatcher::only(expected).match_field(&candidate.context) {
        Some(m) => Some(m.score),
        None if everything.match_field(&candidate.context).is_none() => Some(0.0),
        None => None,
    }
}

fn field<T: Into<FieldValue>>(
    name: FieldName,
    candidate: Candidate<T>,
    confidence: f64,
    page: u32,
) -> (FieldName, ExtractedField) {
    (
        name,
        ExtractedField::new(candidate.value, confidence, page, candidate.context.trim()),
    )
}
