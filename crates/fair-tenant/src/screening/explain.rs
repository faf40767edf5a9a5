use super::domain::{ExplanationEntry, FeatureStatus, FeatureVector};
use super::policy::{GOOD_INCOME_TO_RENT, GOOD_SAVINGS_RUNWAY, LOW_STRESS_PSI};

/// Breakdown for income-to-rent, savings runway and payment stress, in that order.
pub fn explain_features(features: &FeatureVector) -> Vec<ExplanationEntry> {
    vec![
        income_to_rent(features.income_to_rent),
        savings_runway(features.savings_runway_months),
        payment_stress(features.payment_stress_index),
    ]
}

fn income_to_rent(ratio: f64) -> ExplanationEntry {
    let value = if ratio > 0.0 {
        format!("{}%", (100.0 / ratio).trunc() as i64)
    } else {
        "N/A".to_string()
    };

    let (status, explanation) = if ratio >= GOOD_INCOME_TO_RENT {
        (FeatureStatus::Good, "Rent consumes a low share of income")
    } else {
        (FeatureStatus::Risk, "Rent consumes a high share of income")
    };

    entry("Income-to-Rent Ratio", value, status, explanation)
}

fn savings_runway(months: f64) -> ExplanationEntry {
    let (status, explanation) = if months >= GOOD_SAVINGS_RUNWAY {
        (
            FeatureStatus::Good,
            "Strong financial buffer against income shocks",
        )
    } else {
        (FeatureStatus::Moderate, "Limited savings buffer")
    };

    entry(
        "Savings Runway",
        format!("{} months", months.trunc() as i64),
        status,
        explanation,
    )
}

fn payment_stress(index: f64) -> ExplanationEntry {
    let (status, explanation) = if index <= LOW_STRESS_PSI {
        (FeatureStatus::Good, "Low financial stress after obligations")
    } else {
        (FeatureStatus::Risk, "High financial stress after obligations")
    };

    entry("Payment Stress", format!("{index:.2}"), status, explanation)
}

fn entry(name: &str, value: String, status: FeatureStatus, explanation: &str) -> ExplanationEntry {
    ExplanationEntry {
        name: name.to_string(),
        value,
        status,
        explanation: explanation.to_string(),
    }
}
