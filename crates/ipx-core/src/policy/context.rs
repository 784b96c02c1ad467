//! Keyword-based field labeling of context windows.

use crate::models::policy::FieldName;

use super::taxonomy::{fields_accepting, FieldSpec, ValueKind, TAXONOMY};

/// Weight of keyword proximity in the combined score.
const PROXIMITY_WEIGHT: f64 = 0.6;
/// Weight of keyword specificity in the combined score.
const SPECIFICITY_WEIGHT: f64 = 0.4;
/// Keyword length at which specificity saturates.
const SPECIFIC_KEYWORD_LEN: f64 = 25.0;

/// Best field for a context window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch {
    pub field: FieldName,
    pub keyword: &'static str,
    pub score: f64,
}

/// Scores context windows against a view of the taxonomy.
#[derive(Debug, Clone)]
pub struct ContextMatcher {
    fields: Vec<&'static FieldSpec>,
}

impl ContextMatcher {
    /// Matcher over an explicit set of fields.
    pub fn new(fields: Vec<&'static FieldSpec>) -> Self {
        Self { fields }
    }

    /// Matcher over the whole taxonomy.
    pub fn all() -> Self {
        Self::new(TAXONOMY.iter().collect())
    }

    /// Matcher over the fields accepting a value kind.
    pub fn for_kind(kind: ValueKind) -> Self {
        Self::new(fields_accepting(kind))
    }

    /// Matcher over a single field.
    pub fn only(field: FieldName) -> Self {
        Self::new(vec![field.spec()])
    }

    /// Return the best-scoring field whose keyword occurs in `context`.
    ///
    /// The value is assumed to sit at the window midpoint. Ties keep the
    /// first pair found.
    pub fn match_field(&self, context: &str) -> Option<FieldMatch> {
        let lower = context.to_lowercase();
        let mut best: Option<FieldMatch> = None;

        for spec in &self.fields {
            for keyword in spec.keywords {
                let Some(score) = keyword_score(&lower, keyword) else {
                    continue;
                };
                if best.is_none_or(|b| score > b.score) {
                    best = Some(FieldMatch {
                        field: spec.name,
                        keyword,
                        score,
                    });
                }
            }
        }

        best
    }
}

impl Default for ContextMatcher {
    fn default() -> Self {
        Self::all()
    }
}

/// Combined proximity/specificity score of `keyword` in a lowercased window.
pub fn keyword_score(window: &str, keyword: &str) -> Option<f64> {
    let byte_pos = window.find(keyword)?;
    let length = window.chars().count();
    if length == 0 {
        return None;
    }

    let position = window[..byte_pos].chars().count();
    let midpoint = length / 2;
    let distance = position.abs_diff(midpoint) as f64;

    let proximity = (1.0 - distance / length as f64).max(0.0);
    let specificity = (keyword.chars().count() as f64 / SPECIFIC_KEYWORD_LEN).min(1.0);

    Some(PROXIMITY_WEIGHT * proximity + SPECIFICITY_WEIGHT * specificity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_total_amount_due_labels_total_premium() {
        let matcher = ContextMatcher::for_kind(ValueKind::Currency);
        let found = matcher.match_field("Total Amount Due: 16,700.00").unwrap();

        assert_eq!(found.field, FieldName::TotalPremium);
        assert_eq!(found.keyword, "total amount due");
        // proximity 1 - 13/27, specificity 16/25
        assert!(approx(found.score, 0.6 * (1.0 - 13.0 / 27.0) + 0.4 * 0.64));
    }

    #[test]
    fn test_no_keyword_yields_none() {
        let matcher = ContextMatcher::all();

        assert_eq!(matcher.match_field("Nothing relevant here 1,234"), None);
        assert_eq!(matcher.match_field(""), None);
    }

    #[test]
    fn test_specificity_saturates() {
        let window = "x".repeat(10) + "goods and services tax" + &"y".repeat(10);
        let score = keyword_score(&window, "goods and services tax").unwrap();

        // keyword of 22 chars: specificity 0.88
        assert!(score <= 1.0);
        assert!(approx(score, 0.6 * (1.0 - 11.0 / 42.0) + 0.4 * 0.88));
    }

    #[test]
    fn test_case_insensitive_and_unicode_positions() {
        let matcher = ContextMatcher::only(FieldName::SumInsured);
        let found = matcher.match_field("₹₹ SUM INSURED ₹ 5,00,000").unwrap();

        assert_eq!(found.field, FieldName::SumInsured);
        assert_eq!(found.keyword, "sum insured");
    }

    #[test]
    fn test_nearer_keyword_wins() {
        let matcher = ContextMatcher::for_kind(ValueKind::Currency);
        let found = matcher
            .match_field("Deductible: see schedule. Net Premium: 15,000.00 as per terms")
            .unwrap();

        assert_eq!(found.field, FieldName::NetPremium);
    }

    #[test]
    fn test_kind_view_excludes_other_fields() {
        let matcher = ContextMatcher::for_kind(ValueKind::Percentage);
        let found = matcher.match_field("GST Amount (18%)").unwrap();

        assert_eq!(found.field, FieldName::GstRate);
    }
}
