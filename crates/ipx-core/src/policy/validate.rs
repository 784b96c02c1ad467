//! Range and format sanity checks for extracted values.
//!
//! Validators never reject a value outright. They report a verdict which the
//! caller turns into a confidence penalty.

use crate::models::policy::FieldName;

use super::rules::patterns::{DATE_DMY, DATE_MONTH_FIRST, DATE_WRITTEN, DATE_YMD};
use super::taxonomy::AmountCategory;

/// Outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Check a currency value against its field's plausible range.
pub fn validate_currency(value: f64, field: FieldName) -> Verdict {
    if value < 0.0 {
        return Verdict::invalid("Negative value not allowed");
    }

    let Some(category) = field.spec().category else {
        return Verdict::valid();
    };

    let (min, max) = category.range();
    if value < min || value > max {
        let kind = match category {
            AmountCategory::Premium => "Premium",
            AmountCategory::Coverage => "Coverage",
            AmountCategory::DeclaredValue => "Declared value",
            AmountCategory::Deductible => "Deductible",
        };
        return Verdict::invalid(format!(
            "{} {} outside reasonable range ({} - {})",
            kind, value, min, max
        ));
    }

    Verdict::valid()
}

/// Re-check the lexical shape of a date string.
///
/// Calendar validity is not checked: "32/13/2024" passes.
pub fn validate_date(date: &str) -> Verdict {
    let date = date.trim();
    let shapes = [&*DATE_DMY, &*DATE_YMD, &*DATE_WRITTEN, &*DATE_MONTH_FIRST];

    let whole_match = shapes
        .iter()
        .any(|re| re.find(date).is_some_and(|m| m.start() == 0 && m.end() == date.len()));

    if whole_match {
        Verdict::valid()
    } else {
        Verdict::invalid("Invalid date format")
    }
}

/// A percentage is valid iff it lies in [0, 100].
pub fn validate_percentage(value: f64) -> Verdict {
    if (0.0..=100.0).contains(&value) {
        Verdict::valid()
    } else {
        Verdict::invalid(format!("Percentage {} outside valid range (0-100)", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_currency_ranges() {
        assert!(validate_currency(25_000.0, FieldName::AnnualPremium).is_valid);
        assert!(!validate_currency(-1_000.0, FieldName::MonthlyPremium).is_valid);
        assert!(!validate_currency(1_500_000_000.0, FieldName::SumInsured).is_valid);
        assert!(validate_currency(500_000.0, FieldName::SumInsured).is_valid);
        assert!(!validate_currency(120.0, FieldName::TotalPremium).is_valid);
        assert!(validate_currency(550_000.0, FieldName::Idv).is_valid);
        assert!(validate_currency(2_500.0, FieldName::Deductible).is_valid);
    }

    #[test]
    fn test_validate_currency_uncategorized_only_checks_sign() {
        assert!(validate_currency(12.0, FieldName::GstAmount).is_valid);
        assert!(!validate_currency(-12.0, FieldName::GstAmount).is_valid);
    }

    #[test]
    fn test_invalid_currency_carries_message() {
        let verdict = validate_currency(100.0, FieldName::TotalPremium);

        assert!(verdict.message.starts_with("Premium 100 outside reasonable range"));
    }

    #[test]
    fn test_validate_date_shapes() {
        assert!(validate_date("15/01/2024").is_valid);
        assert!(validate_date("15 Jan 2024").is_valid);
        assert!(validate_date("15th January 2044").is_valid);
        assert!(validate_date("2024-01-15").is_valid);
        assert!(validate_date("January 15, 2024").is_valid);
        assert!(!validate_date("invalid-date").is_valid);
        assert!(!validate_date("15/01/2024 and more").is_valid);
    }

    #[test]
    fn test_validate_date_ignores_calendar() {
        assert!(validate_date("32/13/2024").is_valid);
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(18.0).is_valid);
        assert!(validate_percentage(5.5).is_valid);
        assert!(validate_percentage(0.0).is_valid);
        assert!(!validate_percentage(-10.0).is_valid);
        assert!(!validate_percentage(150.0).is_valid);
    }
}
