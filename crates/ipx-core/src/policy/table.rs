//! Financial table interpretation.
//!
//! The first row of a table is its header. A table is kept when a financial
//! keyword appears in the header or, failing that, in any body cell. Body
//! rows matching one of a fixed set of row rules contribute field candidates
//! with a rule-specific confidence.

use tracing::{debug, trace};

use crate::models::page::Table;
use crate::models::policy::{ExtractedField, FieldName, TableRecord, TableType};

use super::rules::parse_amount;
use super::rules::patterns::{
    DATE_DMY, DATE_MONTH_FIRST, DATE_WRITTEN, DATE_YMD, FINANCIAL_KEYWORD, ROW_NUMERAL,
};

/// Default floor below which GST rows are noise.
pub const GST_NOISE_FLOOR: f64 = 50.0;

/// One row pattern: the row must contain any of `any` and none of `unless`.
struct RowRule {
    any: &'static [&'static str],
    unless: &'static [&'static str],
    field: FieldName,
    confidence: f64,
}

impl RowRule {
    fn matches(&self, row_text: &str) -> bool {
        self.any.iter().any(|k| row_text.contains(k))
            && !self.unless.iter().any(|k| row_text.contains(k))
    }
}

/// Row rules in priority order; the first matching rule wins.
static ROW_RULES: &[RowRule] = &[
    RowRule {
        any: &["premium paid", "amount paid"],
        unless: &[],
        field: FieldName::TotalPremium,
        confidence: 0.93,
    },
    RowRule {
        any: &["insured declared value", "idv"],
        unless: &[],
        field: FieldName::Idv,
        confidence: 0.92,
    },
    RowRule {
        any: &["own damage"],
        unless: &["deductible", "excess"],
        field: FieldName::OwnDamagePremium,
        confidence: 0.89,
    },
    RowRule {
        any: &["third party", "liability premium"],
        unless: &[],
        field: FieldName::ThirdPartyPremium,
        confidence: 0.89,
    },
    RowRule {
        any: &["sum insured", "sum assured"],
        unless: &[],
        field: FieldName::SumInsured,
        confidence: 0.90,
    },
    RowRule {
        any: &["gst", "service tax"],
        unless: &[],
        field: FieldName::GstAmount,
        confidence: 0.90,
    },
    RowRule {
        any: &["no claim bonus", "ncb"],
        unless: &[],
        field: FieldName::Ncb,
        confidence: 0.85,
    },
    RowRule {
        any: &["net premium", "basic premium"],
        unless: &[],
        field: FieldName::NetPremium,
        confidence: 0.88,
    },
    RowRule {
        any: &["total premium", "gross premium", "total payable"],
        unless: &[],
        field: FieldName::TotalPremium,
        confidence: 0.88,
    },
    RowRule {
        any: &["deductible", "compulsory excess"],
        unless: &[],
        field: FieldName::Deductible,
        confidence: 0.86,
    },
];

/// A kept table and the fields mined from its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpretedTable {
    pub record: TableRecord,
    pub fields: Vec<(FieldName, ExtractedField)>,
}

/// Classifies tables and mines well-known rows.
#[derive(Debug, Clone)]
pub struct TableInterpreter {
    gst_noise_floor: f64,
}

impl TableInterpreter {
    pub fn new() -> Self {
        Self {
            gst_noise_floor: GST_NOISE_FLOOR,
        }
    }

    /// Set the GST noise floor.
    pub fn with_gst_noise_floor(mut self, floor: f64) -> Self {
        self.gst_noise_floor = floor;
        self
    }

    /// Interpret a table found on `page`.
    ///
    /// Returns `None` for tables with fewer than two rows or without any
    /// financial keyword.
    pub fn interpret(&self, table: &Table, page: u32) -> Option<InterpretedTable> {
        let (header, body) = table.split_first()?;
        if body.is_empty() {
            return None;
        }

        let header_text = join_lower(header, " ");
        let table_type = if contains_financial_keyword(&header_text) {
            classify_header(&header_text)
        } else if body
            .iter()
            .flatten()
            .flatten()
            .any(|cell| contains_financial_keyword(&cell.to_lowercase()))
        {
            TableType::None
        } else {
            trace!("Skipping non-financial table on page {}", page);
            return None;
        };

        let fields: Vec<_> = body
            .iter()
            .enumerate()
            .filter_map(|(i, row)| self.mine_row(row, i + 1, page))
            .collect();

        debug!(
            "Table on page {} tagged {:?} with {} row fields",
            page,
            table_type,
            fields.len()
        );

        Some(InterpretedTable {
            record: TableRecord {
                page,
                headers: header.clone(),
                rows: body.to_vec(),
                table_type,
            },
            fields,
        })
    }

    /// Apply the first matching row rule to a body row. `row_index` counts
    /// the header as row 0.
    fn mine_row(
        &self,
        row: &[Option<String>],
        row_index: usize,
        page: u32,
    ) -> Option<(FieldName, ExtractedField)> {
        let row_text = join_lower(row, " | ");
        let rule = ROW_RULES.iter().find(|rule| rule.matches(&row_text))?;
        let (value, column) = last_amount(row)?;

        if rule.field == FieldName::GstAmount && value < self.gst_noise_floor {
            trace!("Dropping GST row value {} below noise floor", value);
            return None;
        }

        let context = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or("").trim())
            .collect::<Vec<_>>()
            .join(" | ");

        let field = ExtractedField::new(value, rule.confidence, page, context)
            .with_coordinates(row_index as f64, column as f64);

        Some((rule.field, field))
    }
}

impl Default for TableInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn join_lower(cells: &[Option<String>], sep: &str) -> String {
    cells
        .iter()
        .map(|cell| cell.as_deref().unwrap_or("").trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(sep)
}

fn contains_financial_keyword(text: &str) -> bool {
    FINANCIAL_KEYWORD.is_match(text)
}

fn classify_header(header_text: &str) -> TableType {
    if header_text.contains("premium") {
        TableType::PremiumBreakdown
    } else if ["coverage", "benefit", "sum insured"]
        .iter()
        .any(|k| header_text.contains(k))
    {
        TableType::CoverageDetails
    } else {
        TableType::FinancialData
    }
}

/// Last numeral of at least 1 in the row that is neither a percentage nor
/// part of a date, with its column index.
fn last_amount(row: &[Option<String>]) -> Option<(f64, usize)> {
    let mut last = None;

    for (column, cell) in row.iter().enumerate() {
        let Some(cell) = cell else {
            continue;
        };
        let dates: Vec<_> = [&*DATE_DMY, &*DATE_YMD, &*DATE_WRITTEN, &*DATE_MONTH_FIRST]
            .into_iter()
            .flat_map(|pattern| pattern.find_iter(cell).map(|m| m.range()))
            .collect();

        for m in ROW_NUMERAL.find_iter(cell) {
            if dates.iter().any(|d| d.start < m.end() && m.start() < d.end) {
                continue;
            }
            if cell[m.end()..].trim_start().starts_with('%') {
                continue;
            }
            if let Some(value) = parse_amount(m.as_str()).filter(|v| *v >= 1.0) {
                last = Some((value, column));
            }
        }
    }

    last
}
