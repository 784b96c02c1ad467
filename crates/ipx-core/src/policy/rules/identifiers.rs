//! Policy number and vehicle registration extraction.

use super::patterns::{POLICY_CODE, POLICY_LABELED, VEHICLE_REGISTRATION};
use super::{context_window, Candidate, FieldExtractor, SeenMatches};
use crate::policy::taxonomy::ValueKind;

/// Default context radius for identifier matches.
pub const IDENTIFIER_CONTEXT_RADIUS: usize = 30;

const MIN_POLICY_LEN: usize = 6;
const MAX_POLICY_LEN: usize = 25;

/// Policy / certificate number extractor.
///
/// Labeled codes come first, then unlabeled code shapes.
pub struct PolicyNumberExtractor {
    radius: usize,
}

impl PolicyNumberExtractor {
    pub fn new() -> Self {
        Self {
            radius: IDENTIFIER_CONTEXT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for PolicyNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PolicyNumberExtractor {
    type Output = Candidate<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        let mut seen = SeenMatches::default();

        for caps in POLICY_LABELED.captures_iter(text) {
            let Some(code) = caps.get(1) else {
                continue;
            };
            // The code must not continue past the 25-character cap.
            let runs_on = text[code.end()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '/' || c == '-');
            let value = code.as_str().trim_end_matches(['/', '-']);
            if runs_on
                || !(MIN_POLICY_LEN..=MAX_POLICY_LEN).contains(&value.len())
                || !value.chars().any(|c| c.is_ascii_digit())
                || !seen.first_sighting(&value, code.start())
            {
                continue;
            }

            let label_start = caps.get(0).map_or(code.start(), |m| m.start());
            let context = context_window(text, label_start, code.end(), self.radius);
            results.push(Candidate::new(value.to_string(), ValueKind::Identifier, context));
        }

        for caps in POLICY_CODE.captures_iter(text) {
            let Some(code) = caps.get(1) else {
                continue;
            };
            if !seen.first_sighting(&code.as_str(), code.start()) {
                continue;
            }

            let context = context_window(text, code.start(), code.end(), self.radius);
            results.push(Candidate::new(
                code.as_str().to_string(),
                ValueKind::Identifier,
                context,
            ));
        }

        results
    }
}

/// Vehicle registration extractor. Values are normalized to upper case
/// without separators ("UP 14 DX 9941" -> "UP14DX9941").
pub struct VehicleRegistrationExtractor {
    radius: usize,
}

impl VehicleRegistrationExtractor {
    pub fn new() -> Self {
        Self {
            radius: IDENTIFIER_CONTEXT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }
}

impl Default for VehicleRegistrationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VehicleRegistrationExtractor {
    type Output = Candidate<String>;

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut seen = SeenMatches::default();

        VEHICLE_REGISTRATION
            .captures_iter(text)
            .filter_map(|caps| {
                let full = caps.get(0)?;
                let value = format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4]);
                if !seen.first_sighting(&value, full.start()) {
                    return None;
                }
                let context = context_window(text, full.start(), full.end(), self.radius);
                Some(Candidate::new(value, ValueKind::Identifier, context))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policies(text: &str) -> Vec<String> {
        PolicyNumberExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    fn registrations(text: &str) -> Vec<String> {
        VehicleRegistrationExtractor::new()
            .extract_all(text)
            .into_iter()
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn test_labeled_policy_numbers() {
        assert_eq!(policies("Policy Number: LI/2024/123456"), vec!["LI/2024/123456"]);
        assert_eq!(policies("Policy No.: ABC-12345-DEF"), vec!["ABC-12345-DEF"]);
        assert_eq!(policies("Certificate No 3005/12345678"), vec!["3005/12345678"]);
    }

    #[test]
    fn test_labeled_policy_number_needs_a_digit() {
        assert!(policies("Policy Nominee: SPOUSE").is_empty());
    }

    #[test]
    fn test_overlong_code_is_rejected() {
        assert!(policies("Policy No: ABCDEFGHIJ1234567890KLMNOPQRS").is_empty());
    }

    #[test]
    fn test_unlabeled_code_shape() {
        assert_eq!(policies("Ref MOT-12345678 issued"), vec!["MOT-12345678"]);
        assert!(policies("Ref MOT-12345 issued").is_empty());
    }

    #[test]
    fn test_labeled_and_unlabeled_overlap_once() {
        assert_eq!(policies("Policy No: HLT/00012345"), vec!["HLT/00012345"]);
    }

    #[test]
    fn test_vehicle_registration_formats() {
        assert_eq!(registrations("Vehicle Registration No: UP 14 DX 9941"), vec!["UP14DX9941"]);
        assert_eq!(registrations("Registration Number: UP14DX9941"), vec!["UP14DX9941"]);
        assert_eq!(registrations("Reg No: MH-12-AB-1234"), vec!["MH12AB1234"]);
        assert_eq!(registrations("Registration: DL 01 CA 1234"), vec!["DL01CA1234"]);
        assert_eq!(registrations("Vehicle: TN09BX7890"), vec!["TN09BX7890"]);
    }

    #[test]
    fn test_multiple_vehicles_in_one_text() {
        assert_eq!(
            registrations("Multiple vehicles: UP 14 DX 9941 and MH12AB1234 in same text"),
            vec!["UP14DX9941", "MH12AB1234"]
        );
    }
}
