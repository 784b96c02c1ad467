//! Percentage extraction (GST rate, NCB, co-payment).

use super::patterns::PERCENTAGE;
use super::{context_window, Candidate, FieldExtractor, SeenMatches};
use crate::policy::taxonomy::ValueKind;

/// Default context radius for percentage matches.
pub const PERCENTAGE_CONTEXT_RADIUS: usize = 30;

/// Percentage extractor. Values are the number before the `%` sign.
pub struct PercentageExtractor {
    radius: usize,
}

impl PercentageExtractor {
    pub fn new() -> Self {
        Self {
            radius: PERCENTAGE_CONTEXT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for PercentageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PercentageExtractor {
    type Output = Candidate<f64>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut seen = SeenMatches::default();

        PERCENTAGE
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let value: f64 = caps.get(1)?.as_str().parse().ok()?;
                if !seen.first_sighting(&value, full.start()) {
                    return None;
                }
                let context = context_window(text, full.start(), full.end(), self.radius);
                Some(Candidate::new(value, ValueKind::Percentage, context))
            })
            .collect()
    }
}
