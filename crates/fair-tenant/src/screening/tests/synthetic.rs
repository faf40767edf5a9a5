use std::collections::BTreeSet;

use crate::screening::legacy::{fit_legacy_model, TrainingRow};
use crate::screening::synthetic::{generate_population, DEFAULT_SEED};

#[test]
fn same_seed_reproduces_the_population() {
    let first = generate_population(200, 7);
    let second = generate_population(200, 7);
    let other = generate_population(200, 8);

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn population_spans_the_three_groups() {
    let population = generate_population(500, DEFAULT_SEED);
    let groups: BTreeSet<&str> = population.iter().map(|a| a.group.as_str()).collect();

    assert_eq!(
        groups.into_iter().collect::<Vec<_>>(),
        vec!["Black", "Hispanic", "White"]
    );
}

#[test]
fn generated_values_stay_in_bounds() {
    for applicant in generate_population(300, DEFAULT_SEED) {
        let legacy = applicant.legacy;
        assert!((300.0..=850.0).contains(&legacy.credit_score));
        assert!((0.0..=100.0).contains(&legacy.income_stability));
        assert!((0.0..=1.0).contains(&legacy.savings_ratio));
        assert!(legacy.voucher <= 1 && legacy.eviction_history <= 1);
        assert!(applicant.approved.is_finite());

        let record = &applicant.record;
        assert!(record.validate().is_ok(), "{record:?}");
        assert!((600.0..=3000.0).contains(&record.monthly_rent));
        assert!((800.0..=20_000.0).contains(&record.monthly_income));
        assert_eq!(record.income_history.as_ref().map(Vec::len), Some(6));
    }
}

#[test]
fn labeled_view_keeps_group_and_record() {
    let applicant = generate_population(1, DEFAULT_SEED).remove(0);
    let labeled = applicant.labeled();

    assert_eq!(labeled.group, applicant.group);
    assert_eq!(labeled.record, applicant.record);
    assert_eq!(applicant.training_row().approved, applicant.approved);
}

#[test]
fn generated_table_trains_a_usable_legacy_model() {
    let rows: Vec<TrainingRow> = generate_population(1000, DEFAULT_SEED)
        .iter()
        .map(|applicant| applicant.training_row())
        .collect();
    let (_, summary) = fit_legacy_model(&rows).expect("fits");

    assert_eq!(summary.rows, 1000);
    assert!(summary.r_squared > 0.5, "r2 = {}", summary.r_squared);
}

#[test]
fn empty_population_is_allowed() {
    assert!(generate_population(0, DEFAULT_SEED).is_empty());
}
