//! Field keyword taxonomy.
//!
//! Every [`FieldName`] maps to an ordered list of keyword phrases, the value
//! kinds it accepts, and the amount category used for range validation.

use crate::models::policy::FieldName;

/// Kind of value a pattern family produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Currency,
    Date,
    Percentage,
    Identifier,
}

/// Range-validation category for currency fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCategory {
    Premium,
    Coverage,
    DeclaredValue,
    Deductible,
}

impl AmountCategory {
    /// Plausible (min, max) for the category.
    pub fn range(&self) -> (f64, f64) {
        match self {
            AmountCategory::Premium => (500.0, 100_000_000.0),
            AmountCategory::Coverage => (10_000.0, 1_000_000_000.0),
            AmountCategory::DeclaredValue => (5_000.0, 100_000_000.0),
            AmountCategory::Deductible => (0.0, 1_000_000.0),
        }
    }
}

/// Static description of one field.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: FieldName,
    pub keywords: &'static [&'static str],
    pub kinds: &'static [ValueKind],
    pub category: Option<AmountCategory>,
}

impl FieldSpec {
    pub fn accepts(&self, kind: ValueKind) -> bool {
        self.kinds.contains(&kind)
    }
}

use AmountCategory::*;
use ValueKind::*;

/// The field taxonomy, in match priority order.
pub static TAXONOMY: &[FieldSpec] = &[
    FieldSpec {
        name: FieldName::PolicyNumber,
        keywords: &[
            "policy number",
            "policy no",
            "policy #",
            "certificate number",
            "certificate no",
            "policy id",
        ],
        kinds: &[Identifier],
        category: None,
    },
    FieldSpec {
        name: FieldName::VehicleRegistration,
        keywords: &[
            "vehicle registration",
            "registration number",
            "registration no",
            "reg no",
            "vehicle no",
            "registration",
        ],
        kinds: &[Identifier],
        category: None,
    },
    FieldSpec {
        name: FieldName::IssueDate,
        keywords: &[
            "issue date",
            "date of issue",
            "policy issue",
            "issued on",
            "commencement date",
        ],
        kinds: &[Date],
        category: None,
    },
    FieldSpec {
        name: FieldName::EffectiveDate,
        keywords: &[
            "effective date",
            "start date",
            "commence date",
            "from date",
            "policy start",
            "effective from",
            "period of insurance",
        ],
        kinds: &[Date],
        category: None,
    },
    FieldSpec {
        name: FieldName::ExpiryDate,
        keywords: &[
            "expiry date",
            "end date",
            "valid till",
            "valid upto",
            "policy expiry",
            "expire",
        ],
        kinds: &[Date],
        category: None,
    },
    FieldSpec {
        name: FieldName::MaturityDate,
        keywords: &["maturity date", "date of maturity", "maturity"],
        kinds: &[Date],
        category: None,
    },
    FieldSpec {
        name: FieldName::AnnualPremium,
        keywords: &[
            "annual premium",
            "yearly premium",
            "premium per annum",
            "total annual premium",
            "annualized premium",
        ],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::MonthlyPremium,
        keywords: &[
            "monthly premium",
            "premium per month",
            "monthly installment",
            "per month",
        ],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::TotalPremium,
        keywords: &[
            "total premium",
            "gross premium",
            "premium payable",
            "total amount due",
            "total payable",
            "final premium",
            "premium paid",
            "total amount",
            "amount payable",
            "total due",
        ],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::NetPremium,
        keywords: &[
            "net premium",
            "basic premium",
            "base premium",
            "premium amount",
            "amount before tax",
        ],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::OwnDamagePremium,
        keywords: &["own damage premium", "od premium", "own damage"],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::ThirdPartyPremium,
        keywords: &[
            "third party premium",
            "liability premium",
            "tp premium",
            "third party",
        ],
        kinds: &[Currency],
        category: Some(Premium),
    },
    FieldSpec {
        name: FieldName::SumInsured,
        keywords: &[
            "sum insured",
            "sum assured",
            "coverage limit",
            "limit of liability",
            "cover amount",
            "insured amount",
            "face value",
            "death benefit",
            "coverage",
        ],
        kinds: &[Currency],
        category: Some(Coverage),
    },
    FieldSpec {
        name: FieldName::Idv,
        keywords: &["insured declared value", "declared value", "idv"],
        kinds: &[Currency],
        category: Some(DeclaredValue),
    },
    FieldSpec {
        name: FieldName::Deductible,
        keywords: &[
            "deductible",
            "compulsory excess",
            "voluntary excess",
            "basic excess",
            "excess",
        ],
        kinds: &[Currency],
        category: Some(Deductible),
    },
    FieldSpec {
        name: FieldName::Copay,
        keywords: &["co-payment", "co payment", "copay"],
        kinds: &[Currency, Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::RoomRent,
        keywords: &["room rent", "room charges"],
        kinds: &[Currency, Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::GstAmount,
        keywords: &[
            "goods and services tax",
            "gst amount",
            "service tax",
            "tax amount",
            "igst",
            "cgst",
            "sgst",
            "gst",
        ],
        kinds: &[Currency],
        category: None,
    },
    FieldSpec {
        name: FieldName::GstRate,
        keywords: &["gst rate", "gst @", "igst", "cgst", "sgst", "gst"],
        kinds: &[Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::Discount,
        keywords: &["discount", "rebate", "loyalty bonus"],
        kinds: &[Currency, Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::Ncb,
        keywords: &["no claim bonus", "no claim discount", "ncb"],
        kinds: &[Currency, Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::Depreciation,
        keywords: &["depreciation"],
        kinds: &[Currency, Percentage],
        category: None,
    },
    FieldSpec {
        name: FieldName::CashValue,
        keywords: &[
            "cash value",
            "surrender value",
            "maturity benefit",
            "accumulated value",
        ],
        kinds: &[Currency],
        category: None,
    },
    FieldSpec {
        name: FieldName::Bonus,
        keywords: &[
            "reversionary bonus",
            "terminal bonus",
            "additional benefit",
            "bonus",
        ],
        kinds: &[Currency],
        category: None,
    },
];

/// Auto-insurance indicator fields.
pub const AUTO_INDICATORS: &[FieldName] = &[
    FieldName::Idv,
    FieldName::Ncb,
    FieldName::Depreciation,
    FieldName::OwnDamagePremium,
    FieldName::ThirdPartyPremium,
    FieldName::VehicleRegistration,
];

/// Life-insurance indicator fields.
pub const LIFE_INDICATORS: &[FieldName] = &[
    FieldName::CashValue,
    FieldName::Bonus,
    FieldName::MaturityDate,
];

/// Health-insurance indicator fields.
pub const HEALTH_INDICATORS: &[FieldName] = &[
    FieldName::Deductible,
    FieldName::Copay,
    FieldName::RoomRent,
];

impl FieldName {
    /// Static description of this field.
    pub fn spec(&self) -> &'static FieldSpec {
        TAXONOMY
            .iter()
            .find(|spec| spec.name == *self)
            .unwrap_or_else(|| unreachable!("every field name has a taxonomy entry"))
    }
}

/// Taxonomy entries accepting a value kind, in priority order.
pub fn fields_accepting(kind: ValueKind) -> Vec<&'static FieldSpec> {
    TAXONOMY.iter().filter(|spec| spec.accepts(kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_field_has_one_entry() {
        let names: HashSet<_> = TAXONOMY.iter().map(|spec| spec.name).collect();

        assert_eq!(names.len(), TAXONOMY.len());
        assert_eq!(names.len(), FieldName::ALL.len());
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for spec in TAXONOMY {
            assert!(!spec.keywords.is_empty(), "{} has no keywords", spec.name);
            for keyword in spec.keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_fields_accepting_percentage() {
        let names: Vec<_> = fields_accepting(ValueKind::Percentage)
            .iter()
            .map(|spec| spec.name)
            .collect();

        assert!(names.contains(&FieldName::GstRate));
        assert!(names.contains(&FieldName::Ncb));
        assert!(!names.contains(&FieldName::GstAmount));
    }
}
