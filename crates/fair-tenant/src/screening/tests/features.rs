use super::common::*;
use crate::screening::domain::{ApplicantRecord, FeatureName};
use crate::screening::error::ScreeningError;
use crate::screening::features::compute_features;
use crate::screening::policy::{FALLBACK_PAYMENT_STRESS, MAX_RUNWAY_MONTHS};

#[test]
fn baseline_applicant_produces_expected_ratios() {
    let features = compute_features(&baseline_record()).expect("valid record");

    assert_close(features.income_to_rent, 3.0);
    assert_close(features.post_rent_income, 2000.0);
    assert_close(features.savings_runway_months, 3.0);
    assert_close(features.debt_to_income, 500.0 / 3000.0);
    assert_close(features.payment_stress_index, 0.4);
    assert!(features.income_volatility.is_none());
    assert!(features.income_trend.is_none());
}

#[test]
fn zero_rent_and_income_fall_back_without_errors() {
    let features = compute_features(&empty_record()).expect("zeros are valid");

    assert_eq!(features.income_to_rent, 0.0);
    assert_eq!(features.savings_runway_months, 0.0);
    assert_eq!(features.debt_to_income, 0.0);
    assert_eq!(features.payment_stress_index, FALLBACK_PAYMENT_STRESS);
}

#[test]
fn zero_rent_with_disposable_income_has_no_stress() {
    let features =
        compute_features(&ApplicantRecord::new(3000.0, 0.0, 5000.0, 400.0)).expect("valid");

    assert_eq!(features.income_to_rent, 0.0);
    assert_eq!(features.savings_runway_months, 0.0);
    assert_eq!(features.payment_stress_index, 0.0);
    assert_close(features.post_rent_income, 3000.0);
}

#[test]
fn debt_exceeding_income_uses_maximum_stress() {
    let features =
        compute_features(&ApplicantRecord::new(2000.0, 900.0, 0.0, 2500.0)).expect("valid");

    assert_eq!(features.payment_stress_index, FALLBACK_PAYMENT_STRESS);
    assert_close(features.debt_to_income, 1.25);
}

#[test]
fn rent_above_income_yields_negative_post_rent_income() {
    let features = compute_features(&ApplicantRecord::new(800.0, 1200.0, 0.0, 0.0)).expect("valid");

    assert_close(features.post_rent_income, -400.0);
    assert!(features.income_to_rent < 1.0);
}

#[test]
fn savings_runway_is_capped() {
    let features =
        compute_features(&ApplicantRecord::new(4000.0, 1000.0, 50_000.0, 0.0)).expect("valid");

    assert_eq!(features.savings_runway_months, MAX_RUNWAY_MONTHS);
}

#[test]
fn ratios_stay_in_range_across_inputs() {
    let incomes = [0.0, 450.0, 3200.0, 12_000.0];
    let rents = [0.0, 300.0, 1450.0];
    let savings = [0.0, 900.0, 40_000.0];

    for income in incomes {
        for rent in rents {
            for saved in savings {
                let record = ApplicantRecord::new(income, rent, saved, income * 0.2);
                let features = compute_features(&record).expect("valid");

                if rent > 0.0 {
                    assert_close(features.income_to_rent, income / rent);
                } else {
                    assert_eq!(features.income_to_rent, 0.0);
                }
                assert!((0.0..=MAX_RUNWAY_MONTHS).contains(&features.savings_runway_months));
                for name in [
                    FeatureName::IncomeToRent,
                    FeatureName::SavingsRunwayMonths,
                    FeatureName::DebtToIncome,
                    FeatureName::PaymentStressIndex,
                ] {
                    let value = features.get(name).expect("always present");
                    assert!(value >= 0.0, "{} negative for {record:?}", name.key());
                }
            }
        }
    }
}

#[test]
fn income_history_yields_volatility_and_trend() {
    let record = baseline_record().with_income_history(vec![1000.0, 1000.0, 2000.0, 2000.0]);
    let features = compute_features(&record).expect("valid");

    let stdev = (1_000_000.0_f64 / 3.0).sqrt();
    assert_close(features.income_volatility.expect("volatility"), stdev / 1500.0);
    assert_close(features.income_trend.expect("trend"), 1.0);
}

#[test]
fn odd_length_history_puts_midpoint_in_second_half() {
    let record = baseline_record().with_income_history(vec![2000.0, 1000.0, 3000.0]);
    let features = compute_features(&record).expect("valid");

    // first half [2000], second half [1000, 3000]
    assert_close(features.income_trend.expect("trend"), 0.0);
    assert_close(features.income_volatility.expect("volatility"), 0.5);
}

#[test]
fn short_history_leaves_stability_features_absent() {
    let record = baseline_record().with_income_history(vec![3000.0, 3100.0]);
    let features = compute_features(&record).expect("valid");

    assert!(features.get(FeatureName::IncomeVolatility).is_none());
    assert!(features.get(FeatureName::IncomeTrend).is_none());
}

#[test]
fn zero_income_history_reports_flat_stability() {
    let record = baseline_record().with_income_history(vec![0.0, 0.0, 0.0]);
    let features = compute_features(&record).expect("valid");

    assert_eq!(features.income_volatility, Some(0.0));
    assert_eq!(features.income_trend, Some(0.0));
}

#[test]
fn negative_amounts_are_rejected() {
    let record = ApplicantRecord::new(3000.0, -10.0, 0.0, 0.0);

    match compute_features(&record) {
        Err(ScreeningError::InvalidInput { field, .. }) => assert_eq!(field, "monthly_rent"),
        other => panic!("expected invalid rent, got {other:?}"),
    }
}

#[test]
fn non_finite_history_is_rejected() {
    let record = baseline_record().with_income_history(vec![1000.0, f64::NAN, 1200.0]);

    assert!(matches!(
        compute_features(&record),
        Err(ScreeningError::InvalidInput {
            field: "income_history",
            ..
        })
    ));
}
