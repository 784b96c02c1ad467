//! Rule-based candidate extractors for insurance documents.

pub mod amounts;
pub mod dates;
pub mod identifiers;
pub mod patterns;
pub mod percentages;

use std::collections::HashSet;

pub use amounts::{parse_amount, CurrencyExtractor, DeclaredValueExtractor};
pub use dates::DateExtractor;
pub use identifiers::{PolicyNumberExtractor, VehicleRegistrationExtractor};
pub use percentages::PercentageExtractor;

use super::taxonomy::ValueKind;

/// Trait for candidate extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first candidate from text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all candidates.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An unlabeled value found by a pattern, with its context window.
///
/// The window is kept untrimmed so the match stays at its midpoint; the
/// page is attached when the candidate becomes an extracted field.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    /// Parsed value.
    pub value: T,
    /// Text window around the match.
    pub context: String,
    /// Value category of the pattern that produced it.
    pub kind: ValueKind,
}

impl<T> Candidate<T> {
    pub fn new(value: T, kind: ValueKind, context: impl Into<String>) -> Self {
        Self {
            value,
            context: context.into(),
            kind,
        }
    }
}

/// Slice `radius` characters on each side of `start..end`, clamped to the
/// text bounds.
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}

/// Drops repeated (value, start offset) pairs across overlapping patterns.
#[derive(Debug, Default)]
pub(crate) struct SeenMatches(HashSet<(String, usize)>);

impl SeenMatches {
    /// Returns true the first time a pair is seen.
    pub(crate) fn first_sighting(&mut self, value: &impl ToString, start: usize) -> bool {
        self.0.insert((value.to_string(), start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_clamps_to_bounds() {
        let text = "Sum Insured: 5,00,000";

        assert_eq!(context_window(text, 13, 21, 50), text);
        assert_eq!(context_window(text, 13, 21, 3), "d: 5,00,000");
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "₹₹₹ 500 ₹₹";
        let start = text.find('5').unwrap();

        assert_eq!(context_window(text, start, start + 3, 2), "₹ 500 ₹");
    }

    #[test]
    fn test_seen_matches() {
        let mut seen = SeenMatches::default();

        assert!(seen.first_sighting(&4500.0, 10));
        assert!(!seen.first_sighting(&4500.0, 10));
        assert!(seen.first_sighting(&4500.0, 12));
    }
}
