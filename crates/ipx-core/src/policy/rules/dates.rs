//! Date extraction for insurance documents.
//!
//! Only the lexical shape is matched here; calendar validity is left to the
//! validator.

use super::patterns::{DATE_DMY, DATE_MONTH_FIRST, DATE_WRITTEN, DATE_YMD};
use super::{context_window, Candidate, FieldExtractor, SeenMatches};
use crate::policy::taxonomy::ValueKind;

/// Default context radius for date matches.
pub const DATE_CONTEXT_RADIUS: usize = 30;

/// Date field extractor.
pub struct DateExtractor {
    radius: usize,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            radius: DATE_CONTEXT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = Candidate<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        let mut seen = SeenMatches::default();

        for pattern in [&*DATE_DMY, &*DATE_WRITTEN, &*DATE_YMD, &*DATE_MONTH_FIRST] {
            for m in pattern.find_iter(text) {
                let date = m.as_str().trim().to_string();
                if !seen.first_sighting(&date, m.start()) {
                    continue;
                }

                let context = context_window(text, m.start(), m.end(), self.radius);
                results.push(Candidate::new(date, ValueKind::Date, context));
            }
        }

        results
    }
}
