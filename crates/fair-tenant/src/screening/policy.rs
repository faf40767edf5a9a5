//! Fixed scoring policy shared by the extractor, scorer, explainer and impact
//! calculator.

use super::domain::FeatureName;

/// Months of rent that savings are credited for, at most.
pub const MAX_RUNWAY_MONTHS: f64 = 12.0;

/// Stress index used when income left after debt is zero or negative.
pub const FALLBACK_PAYMENT_STRESS: f64 = 1.0;

/// Minimum number of history points before volatility and trend are reported.
pub const MIN_HISTORY_POINTS: usize = 3;

/// Signed weight applied to each scored feature.
pub const WEIGHTS: [(FeatureName, f64); 4] = [
    (FeatureName::IncomeToRent, 0.30),
    (FeatureName::SavingsRunwayMonths, 0.25),
    (FeatureName::PaymentStressIndex, -0.25),
    (FeatureName::DebtToIncome, -0.20),
];

pub const LOW_RISK_SCORE: u8 = 75;
pub const MEDIUM_RISK_SCORE: u8 = 50;

pub const GOOD_INCOME_TO_RENT: f64 = 3.0;
pub const GOOD_SAVINGS_RUNWAY: f64 = 3.0;
pub const LOW_STRESS_PSI: f64 = 0.35;

/// Missed rent months per year expected from a score of zero.
pub const MAX_MISSED_MONTHS_PER_YEAR: f64 = 3.0;

/// Default score an applicant needs to count as approved in audits.
pub const DEFAULT_APPROVAL_THRESHOLD: u8 = MEDIUM_RISK_SCORE;

/// Disparity ratio below which a group is flagged (four-fifths rule).
pub const ADVERSE_IMPACT_RATIO: f64 = 0.8;
