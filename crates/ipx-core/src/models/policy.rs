//! Extraction result models for insurance policy documents.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ExtractionError;

/// Closed set of recognized output fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    PolicyNumber,
    VehicleRegistration,
    IssueDate,
    EffectiveDate,
    ExpiryDate,
    MaturityDate,
    AnnualPremium,
    MonthlyPremium,
    TotalPremium,
    NetPremium,
    OwnDamagePremium,
    ThirdPartyPremium,
    SumInsured,
    Idv,
    Deductible,
    Copay,
    RoomRent,
    GstAmount,
    GstRate,
    Discount,
    Ncb,
    Depreciation,
    CashValue,
    Bonus,
}

impl FieldName {
    /// All field names in taxonomy order.
    pub const ALL: [FieldName; 24] = [
        FieldName::PolicyNumber,
        FieldName::VehicleRegistration,
        FieldName::IssueDate,
        FieldName::EffectiveDate,
        FieldName::ExpiryDate,
        FieldName::MaturityDate,
        FieldName::AnnualPremium,
        FieldName::MonthlyPremium,
        FieldName::TotalPremium,
        FieldName::NetPremium,
        FieldName::OwnDamagePremium,
        FieldName::ThirdPartyPremium,
        FieldName::SumInsured,
        FieldName::Idv,
        FieldName::Deductible,
        FieldName::Copay,
        FieldName::RoomRent,
        FieldName::GstAmount,
        FieldName::GstRate,
        FieldName::Discount,
        FieldName::Ncb,
        FieldName::Depreciation,
        FieldName::CashValue,
        FieldName::Bonus,
    ];

    /// Snake-case name used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::PolicyNumber => "policy_number",
            FieldName::VehicleRegistration => "vehicle_registration",
            FieldName::IssueDate => "issue_date",
            FieldName::EffectiveDate => "effective_date",
            FieldName::ExpiryDate => "expiry_date",
            FieldName::MaturityDate => "maturity_date",
            FieldName::AnnualPremium => "annual_premium",
            FieldName::MonthlyPremium => "monthly_premium",
            FieldName::TotalPremium => "total_premium",
            FieldName::NetPremium => "net_premium",
            FieldName::OwnDamagePremium => "own_damage_premium",
            FieldName::ThirdPartyPremium => "third_party_premium",
            FieldName::SumInsured => "sum_insured",
            FieldName::Idv => "idv",
            FieldName::Deductible => "deductible",
            FieldName::Copay => "copay",
            FieldName::RoomRent => "room_rent",
            FieldName::GstAmount => "gst_amount",
            FieldName::GstRate => "gst_rate",
            FieldName::Discount => "discount",
            FieldName::Ncb => "ncb",
            FieldName::Depreciation => "depreciation",
            FieldName::CashValue => "cash_value",
            FieldName::Bonus => "bonus",
        }
    }

    /// Human-readable label ("total_premium" -> "TOTAL PREMIUM").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == wanted)
            .ok_or_else(|| ExtractionError::UnknownField(s.to_string()))
    }
}

/// A field value: either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    /// Text value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// A single resolved field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    /// Extracted value.
    pub value: FieldValue,

    /// Confidence score (0.0 - 1.0). Serialized with two decimals.
    #[serde(serialize_with = "serialize_confidence")]
    pub confidence: f64,

    /// Page the value was found on (1-indexed).
    pub page: u32,

    /// Text surrounding the value.
    pub context: String,

    /// Cell position (row, column) for table-derived values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<(f64, f64)>,
}

impl ExtractedField {
    pub fn new(
        value: impl Into<FieldValue>,
        confidence: f64,
        page: u32,
        context: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            page,
            context: context.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, x: f64, y: f64) -> Self {
        self.coordinates = Some((x, y));
        self
    }
}

fn serialize_confidence<S: Serializer>(confidence: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((confidence * 100.0).round() / 100.0)
}

/// What happened when a candidate was offered to a [`FieldMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The field was absent and has been placed.
    Inserted,
    /// The candidate beat the stored value.
    Replaced { previous_page: u32 },
    /// The stored value was kept.
    Kept,
}

/// Field name to resolved field. Keys are unique; an entry is replaced only
/// by a candidate with strictly higher confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<FieldName, ExtractedField>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate: keep if absent, else keep if strictly more confident.
    pub fn offer(&mut self, name: FieldName, field: ExtractedField) -> MergeOutcome {
        match self.0.get_mut(&name) {
            None => {
                self.0.insert(name, field);
                MergeOutcome::Inserted
            }
            Some(current) if field.confidence > current.confidence => {
                let previous_page = current.page;
                *current = field;
                MergeOutcome::Replaced { previous_page }
            }
            Some(_) => MergeOutcome::Kept,
        }
    }

    /// Merge another map into this one, recording a warning for every
    /// stored value that gets replaced.
    pub fn absorb(&mut self, other: FieldMap, warnings: &mut Vec<String>) {
        for (name, field) in other.0 {
            let page = field.page;
            if let MergeOutcome::Replaced { .. } = self.offer(name, field) {
                warnings.push(format!(
                    "Duplicate field '{}' found - keeping page {} value (higher confidence)",
                    name, page
                ));
            }
        }
    }

    pub fn get(&self, name: FieldName) -> Option<&ExtractedField> {
        self.0.get(&name)
    }

    pub fn contains(&self, name: FieldName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &ExtractedField)> {
        self.0.iter().map(|(name, field)| (*name, field))
    }

    /// Entries ordered by their serialized name.
    pub fn sorted_by_name(&self) -> Vec<(FieldName, &ExtractedField)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(name, _)| name.as_str());
        entries
    }
}

impl FromIterator<(FieldName, ExtractedField)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (FieldName, ExtractedField)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, field) in iter {
            map.offer(name, field);
        }
        map
    }
}

/// Table classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    PremiumBreakdown,
    CoverageDetails,
    FinancialData,
    None,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::PremiumBreakdown => "premium_breakdown",
            TableType::CoverageDetails => "coverage_details",
            TableType::FinancialData => "financial_data",
            TableType::None => "none",
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A financially relevant table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Page the table was found on.
    pub page: u32,
    /// Header row as extracted.
    pub headers: Vec<Option<String>>,
    /// Body rows as extracted.
    pub rows: Vec<Vec<Option<String>>>,
    /// Table type tag.
    pub table_type: TableType,
}

/// Insurance document classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    AutoInsurance,
    LifeInsurance,
    HealthInsurance,
    GeneralInsurance,
    /// Not classified (input could not be read).
    #[default]
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::AutoInsurance => "auto_insurance",
            DocumentType::LifeInsurance => "life_insurance",
            DocumentType::HealthInsurance => "health_insurance",
            DocumentType::GeneralInsurance => "general_insurance",
            DocumentType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source file name.
    pub filename: String,
    /// When the extraction ran (ISO-8601).
    pub extraction_timestamp: DateTime<Utc>,
    /// Number of pages read.
    pub pages: usize,
    /// Classified document type.
    pub document_type: DocumentType,
}

impl DocumentMetadata {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            extraction_timestamp: Utc::now(),
            pages: 0,
            document_type: DocumentType::Unknown,
        }
    }
}

/// Complete result of one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub document_metadata: DocumentMetadata,
    pub fields: FieldMap,
    pub tables_extracted: Vec<TableRecord>,
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Empty result for a document.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self {
            document_metadata: DocumentMetadata::new(filename),
            fields: FieldMap::new(),
            tables_extracted: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Mean confidence over all fields (0.0 when empty).
    pub fn average_confidence(&self) -> f64 {
        if self.fields.is_empty() {
            return 0.0;
        }
        self.fields.iter().map(|(_, f)| f.confidence).sum::<f64>() / self.fields.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_name_round_trips_through_str() {
        for name in FieldName::ALL {
            assert_eq!(name.as_str().parse::<FieldName>().unwrap(), name);
        }
        assert!("premium_total".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_offer_keeps_strictly_higher_confidence() {
        let mut map = FieldMap::new();

        assert_eq!(
            map.offer(FieldName::SumInsured, ExtractedField::new(500_000.0, 0.6, 1, "")),
            MergeOutcome::Inserted
        );
        assert_eq!(
            map.offer(FieldName::SumInsured, ExtractedField::new(700_000.0, 0.6, 2, "")),
            MergeOutcome::Kept
        );
        assert_eq!(
            map.offer(FieldName::SumInsured, ExtractedField::new(900_000.0, 0.75, 3, "")),
            MergeOutcome::Replaced { previous_page: 1 }
        );

        let kept = map.get(FieldName::SumInsured).unwrap();
        assert_eq!(kept.page, 3);
        assert_eq!(kept.value, FieldValue::Number(900_000.0));
    }

    #[test]
    fn test_absorb_warns_on_replacement() {
        let mut document = FieldMap::new();
        let mut warnings = Vec::new();

        let page_one: FieldMap = [(FieldName::SumInsured, ExtractedField::new(500_000.0, 0.6, 1, ""))]
            .into_iter()
            .collect();
        let page_two: FieldMap = [(FieldName::SumInsured, ExtractedField::new(750_000.0, 0.75, 2, ""))]
            .into_iter()
            .collect();

        document.absorb(page_one, &mut warnings);
        document.absorb(page_two, &mut warnings);

        assert_eq!(document.get(FieldName::SumInsured).unwrap().confidence, 0.75);
        assert_eq!(
            warnings,
            vec!["Duplicate field 'sum_insured' found - keeping page 2 value (higher confidence)".to_string()]
        );
    }

    #[test]
    fn test_result_serializes_four_top_level_keys() {
        let mut result = ExtractionResult::empty("policy.pdf");
        result.fields.offer(
            FieldName::TotalPremium,
            ExtractedField::new(16_700.0, 0.98765, 1, "Total Amount Due: 16,700.00"),
        );

        let value = serde_json::to_value(&result).unwrap();
        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();

        assert_eq!(keys, vec!["document_metadata", "fields", "tables_extracted", "warnings"]);
        assert_eq!(value["fields"]["total_premium"]["confidence"], serde_json::json!(0.99));
        assert_eq!(value["fields"]["total_premium"]["value"], serde_json::json!(16700.0));
        assert_eq!(value["document_metadata"]["document_type"], "unknown");
    }
}
