use serde::{Deserialize, Serialize};

use super::error::ScreeningError;

/// Financial snapshot supplied by an applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub monthly_income: f64,
    pub monthly_rent: f64,
    pub liquid_savings: f64,
    pub monthly_debt: f64,
    #[serde(default)]
    pub income_history: Option<Vec<f64>>,
}

impl ApplicantRecord {
    pub fn new(monthly_income: f64, monthly_rent: f64, liquid_savings: f64, monthly_debt: f64) -> Self {
        Self {
            monthly_income,
            monthly_rent,
            liquid_savings,
            monthly_debt,
            income_history: None,
        }
    }

    pub fn with_income_history(mut self, history: Vec<f64>) -> Self {
        self.income_history = Some(history);
        self
    }

    /// Reject negative or non-finite amounts before any ratio is computed.
    pub fn validate(&self) -> Result<(), ScreeningError> {
        ensure_amount("monthly_income", self.monthly_income)?;
        ensure_amount("monthly_rent", self.monthly_rent)?;
        ensure_amount("liquid_savings", self.liquid_savings)?;
        ensure_amount("monthly_debt", self.monthly_debt)?;

        if let Some(history) = &self.income_history {
            for value in history {
                ensure_amount("income_history", *value)?;
            }
        }

        Ok(())
    }
}

fn ensure_amount(field: &'static str, value: f64) -> Result<(), ScreeningError> {
    if !value.is_finite() {
        return Err(ScreeningError::InvalidInput {
            field,
            reason: "must be a finite number",
        });
    }
    if value < 0.0 {
        return Err(ScreeningError::InvalidInput {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

/// Names of the engineered features, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    IncomeToRent,
    PostRentIncome,
    SavingsRunwayMonths,
    DebtToIncome,
    PaymentStressIndex,
    IncomeVolatility,
    IncomeTrend,
}

impl FeatureName {
    pub const ALL: [FeatureName; 7] = [
        FeatureName::IncomeToRent,
        FeatureName::PostRentIncome,
        FeatureName::SavingsRunwayMonths,
        FeatureName::DebtToIncome,
        FeatureName::PaymentStressIndex,
        FeatureName::IncomeVolatility,
        FeatureName::IncomeTrend,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            FeatureName::IncomeToRent => "income_to_rent",
            FeatureName::PostRentIncome => "post_rent_income",
            FeatureName::SavingsRunwayMonths => "savings_runway_months",
            FeatureName::DebtToIncome => "debt_to_income",
            FeatureName::PaymentStressIndex => "payment_stress_index",
            FeatureName::IncomeVolatility => "income_volatility",
            FeatureName::IncomeTrend => "income_trend",
        }
    }
}

/// Engineered ratios derived from one [`ApplicantRecord`].
///
/// The two history-based features are `None` when fewer than three months of
/// income history were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub income_to_rent: f64,
    pub post_rent_income: f64,
    pub savings_runway_months: f64,
    pub debt_to_income: f64,
    pub payment_stress_index: f64,
    pub income_volatility: Option<f64>,
    pub income_trend: Option<f64>,
}

impl FeatureVector {
    pub fn get(&self, name: FeatureName) -> Option<f64> {
        match name {
            FeatureName::IncomeToRent => Some(self.income_to_rent),
            FeatureName::PostRentIncome => Some(self.post_rent_income),
            FeatureName::SavingsRunwayMonths => Some(self.savings_runway_months),
            FeatureName::DebtToIncome => Some(self.debt_to_income),
            FeatureName::PaymentStressIndex => Some(self.payment_stress_index),
            FeatureName::IncomeVolatility => self.income_volatility,
            FeatureName::IncomeTrend => self.income_trend,
        }
    }
}

/// Risk tier assigned from the bounded score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Good,
    Moderate,
    Risk,
}

impl FeatureStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FeatureStatus::Good => "good",
            FeatureStatus::Moderate => "moderate",
            FeatureStatus::Risk => "risk",
        }
    }
}

/// One line of the human-readable breakdown shown next to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    pub name: String,
    pub value: String,
    pub status: FeatureStatus,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub expected_missed_months: f64,
    pub expected_annual_loss: f64,
}
