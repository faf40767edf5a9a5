use serde::{Deserialize, Serialize};

use crate::screening::domain::ApplicantRecord;

/// Credit score assumed for every applicant since the new intake never asks for one.
pub const ASSUMED_CREDIT_SCORE: f64 = 650.0;

const MAX_INCOME_STABILITY: f64 = 100.0;
const INCOME_STABILITY_PER_RATIO: f64 = 30.0;
const MAX_TENURE_YEARS: f64 = 5.0;
const SAVINGS_RATIO_MONTHS: f64 = 6.0;

/// Column order of the legacy regressor.
pub const LEGACY_FEATURES: [&str; 8] = [
    "credit_score",
    "income_stability",
    "eviction_history",
    "criminal_history",
    "voucher",
    "employment_years",
    "savings_ratio",
    "rental_history_years",
];

/// Indices into [`LEGACY_FEATURES`] that are standardized before prediction.
pub const NUMERIC_COLUMNS: [usize; 5] = [0, 1, 5, 6, 7];

/// Feature set of the credit-score-centric model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyFeatures {
    pub credit_score: f64,
    pub income_stability: f64,
    pub eviction_history: u8,
    pub criminal_history: u8,
    pub voucher: u8,
    pub employment_years: f64,
    pub savings_ratio: f64,
    pub rental_history_years: f64,
}

impl LegacyFeatures {
    pub fn values(&self) -> [f64; 8] {
        [
            self.credit_score,
            self.income_stability,
            f64::from(self.eviction_history),
            f64::from(self.criminal_history),
            f64::from(self.voucher),
            self.employment_years,
            self.savings_ratio,
            self.rental_history_years,
        ]
    }
}

/// Best-effort mapping of the new intake onto the legacy schema.
///
/// Eviction history and voucher status are inferred from thin savings and a
/// low income-to-rent ratio; tenure is approximated by the savings runway.
pub fn adapt_to_legacy(record: &ApplicantRecord) -> LegacyFeatures {
    let income = record.monthly_income;
    let rent = record.monthly_rent;
    let savings = record.liquid_savings;

    let income_to_rent = if rent > 0.0 { income / rent } else { 0.0 };
    let savings_runway = if rent > 0.0 { savings / rent } else { 0.0 };
    let savings_ratio = if income > 0.0 {
        (savings / (income * SAVINGS_RATIO_MONTHS)).min(1.0)
    } else {
        0.0
    };

    LegacyFeatures {
        credit_score: ASSUMED_CREDIT_SCORE,
        income_stability: (income_to_rent * INCOME_STABILITY_PER_RATIO).min(MAX_INCOME_STABILITY),
        eviction_history: u8::from(savings_runway < 1.0),
        criminal_history: 0,
        voucher: u8::from(income_to_rent < 2.0),
        employment_years: savings_runway.min(MAX_TENURE_YEARS),
        savings_ratio,
        rental_history_years: savings_runway.min(MAX_TENURE_YEARS),
    }
}
