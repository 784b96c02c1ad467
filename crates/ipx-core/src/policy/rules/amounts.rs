//! Currency amount extraction for insurance documents.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    CURRENCY_INR, CURRENCY_LABELED, CURRENCY_RS, CURRENCY_SUFFIX, CURRENCY_SYMBOL, DECLARED_VALUE,
};
use super::{context_window, Candidate, FieldExtractor, SeenMatches};
use crate::policy::taxonomy::ValueKind;

/// Amounts below this are stray fragments, not money.
const MIN_AMOUNT: f64 = 1.0;

/// Default context radius for currency matches.
pub const CURRENCY_CONTEXT_RADIUS: usize = 50;

/// Currency amount extractor.
pub struct CurrencyExtractor {
    radius: usize,
}

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self {
            radius: CURRENCY_CONTEXT_RADIUS,
        }
    }

    /// Set the context radius in characters.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = Candidate<f64>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        let mut seen = SeenMatches::default();

        // (pattern, numeral must stand alone)
        let patterns = [
            (&*CURRENCY_SYMBOL, false),
            (&*CURRENCY_RS, false),
            (&*CURRENCY_INR, false),
            (&*CURRENCY_SUFFIX, false),
            (&*CURRENCY_LABELED, true),
        ];

        for (pattern, standalone) in patterns {
            for caps in pattern.captures_iter(text) {
                let Some(numeral) = caps.get(1) else {
                    continue;
                };
                if standalone && !ends_cleanly(&text[numeral.end()..]) {
                    continue;
                }
                let Some(value) = parse_amount(numeral.as_str()) else {
                    continue;
                };
                if value < MIN_AMOUNT || !seen.first_sighting(&value, numeral.start()) {
                    continue;
                }

                let context = context_window(text, numeral.start(), numeral.end(), self.radius);
                results.push(Candidate::new(value, ValueKind::Currency, context));
            }
        }

        results
    }
}

/// True when the text after a numeral does not continue it into a date,
/// time, percentage or longer number. A trailing `.` or `,` is punctuation
/// unless a digit follows.
fn ends_cleanly(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some('.' | ',') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => !(c.is_ascii_digit() || matches!(c, '/' | '-' | '%' | ':')),
    }
}

/// Insured declared value extractor. Every match is labeled by construction.
pub struct DeclaredValueExtractor {
    radius: usize,
}

impl DeclaredValueExtractor {
    pub fn new() -> Self {
        Self {
            radius: CURRENCY_CONTEXT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for DeclaredValueExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DeclaredValueExtractor {
    type Output = Candidate<f64>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut seen = SeenMatches::default();

        DECLARED_VALUE
            .captures_iter(text)
            .filter_map(|caps| {
                let numeral = caps.get(1)?;
                let value = parse_amount(numeral.as_str())?;
                if value < MIN_AMOUNT || !seen.first_sighting(&value, numeral.start()) {
                    return None;
                }
                let context = context_window(text, numeral.start(), numeral.end(), self.radius);
                Some(Candidate::new(value, ValueKind::Currency, context))
            })
            .collect()
    }
}

/// Parse a grouped numeral ("10,00,000.50") into a number.
///
/// Grouping commas and surrounding currency noise are stripped; the rest is
/// parsed exactly as a decimal before conversion.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // exact decimal first; going through its string form keeps f64 rounding correct
    Decimal::from_str(&cleaned).ok()?.to_string().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(text: &str) -> Vec<f64> {
        CurrencyExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("16,700.00"), Some(16700.0));
        assert_eq!(parse_amount("10,00,000"), Some(1_000_000.0));
        assert_eq!(parse_amount("1,234,567.5"), Some(1_234_567.5));
        assert_eq!(parse_amount("₹ 4,500/-"), Some(4500.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_grouped_numerals_convert_exactly() {
        for (text, expected) in [
            ("₹1,00,000.00", 100_000.0),
            ("Rs. 25,000", 25_000.0),
            ("INR 1,234,567.89", 1_234_567.89),
            ("4,500/-", 4_500.0),
            ("Rupees 12,34,567 only", 1_234_567.0),
        ] {
            assert_eq!(values(text), vec![expected], "{}", text);
        }
    }

    #[test]
    fn test_labeled_amount() {
        assert_eq!(values("Total Amount Due: 16,700.00"), vec![16_700.0]);
        assert_eq!(values("GST Amount: 40"), vec![40.0]);
    }

    #[test]
    fn test_labeled_amount_before_punctuation() {
        assert_eq!(values("Total Amount Due: 16,700.00."), vec![16_700.0]);
        assert_eq!(values("Sum Insured: 5,00,000, payable on claim"), vec![500_000.0]);
        assert_eq!(values("Deductible: 2,500; see schedule"), vec![2_500.0]);
    }

    #[test]
    fn test_labeled_form_skips_dates_and_percentages() {
        assert!(values("Issue Date: 15/01/2024").is_empty());
        assert!(values("Issued: 15.01.2024").is_empty());
        assert!(values("GST: 18%").is_empty());
        assert!(values("Time: 10:30").is_empty());
    }

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let found = CurrencyExtractor::new().extract_all("GST (18%): ₹4,500/-");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 4_500.0);
    }

    #[test]
    fn test_values_below_one_are_dropped() {
        assert!(values("Rs. 0.50").is_empty());
    }

    #[test]
    fn test_context_window_surrounds_value() {
        let text = format!("{}Sum Insured: Rs. 10,00,000{}", "x".repeat(80), "y".repeat(80));
        let found = CurrencyExtractor::new().extract_all(&text);

        assert_eq!(found.len(), 1);
        assert!(found[0].context.contains("Sum Insured"));
        assert_eq!(found[0].context.chars().count(), 50 + "10,00,000".len() + 50);
    }

    #[test]
    fn test_context_keeps_surrounding_whitespace() {
        let text = format!("Sum Insured: Rs. 10,00,000{}", " ".repeat(80));
        let found = CurrencyExtractor::new().extract_all(&text);

        assert_eq!(found.len(), 1);
        assert!(found[0].context.ends_with("10,00,000 "));
        assert_eq!(found[0].context.chars().count(), "Sum Insured: Rs. ".len() + 9 + 50);
    }

    #[test]
    fn test_declared_value() {
        let found = DeclaredValueExtractor::new().extract_all("Insured Declared Value (IDV): ₹ 5,50,000");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, 550_000.0);
    }
}
