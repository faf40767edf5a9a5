use super::domain::{ApplicantRecord, FeatureVector};
use super::error::ScreeningError;
use super::policy::{FALLBACK_PAYMENT_STRESS, MAX_RUNWAY_MONTHS, MIN_HISTORY_POINTS};

/// Validate the record and derive its engineered features.
pub fn compute_features(record: &ApplicantRecord) -> Result<FeatureVector, ScreeningError> {
    record.validate()?;
    Ok(derive(record))
}

pub(crate) fn derive(record: &ApplicantRecord) -> FeatureVector {
    let income = record.monthly_income;
    let rent = record.monthly_rent;
    let savings = record.liquid_savings;
    let debt = record.monthly_debt;

    let income_to_rent = if rent > 0.0 { income / rent } else { 0.0 };
    let savings_runway_months = if rent > 0.0 {
        (savings / rent).min(MAX_RUNWAY_MONTHS)
    } else {
        0.0
    };
    let debt_to_income = if income > 0.0 { debt / income } else { 0.0 };

    let disposable_after_debt = income - debt;
    let payment_stress_index = if disposable_after_debt > 0.0 {
        rent / disposable_after_debt
    } else {
        FALLBACK_PAYMENT_STRESS
    };

    let stability = record
        .income_history
        .as_deref()
        .and_then(IncomeStability::from_history);

    FeatureVector {
        income_to_rent,
        post_rent_income: income - rent,
        savings_runway_months,
        debt_to_income,
        payment_stress_index,
        income_volatility: stability.map(|s| s.volatility),
        income_trend: stability.map(|s| s.trend),
    }
}

#[derive(Debug, Clone, Copy)]
struct IncomeStability {
    volatility: f64,
    trend: f64,
}

impl IncomeStability {
    fn from_history(history: &[f64]) -> Option<Self> {
        if history.len() < MIN_HISTORY_POINTS {
            return None;
        }

        let average = mean(history);
        let volatility = if average > 0.0 {
            sample_stdev(history, average) / average
        } else {
            0.0
        };

        let (first_half, second_half) = history.split_at(history.len() / 2);
        let first_mean = mean(first_half);
        let trend = if first_mean > 0.0 {
            (mean(second_half) - first_mean) / first_mean
        } else {
            0.0
        };

        Some(Self { volatility, trend })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_stdev(values: &[f64], mean: f64) -> f64 {
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (squared / (values.len() - 1) as f64).sqrt()
}
