use std::sync::Arc;
use std::thread;

use super::common::*;
use crate::screening::domain::{ApplicantRecord, RiskLevel};
use crate::screening::error::ScreeningError;
use crate::screening::legacy::write_training_rows;
use crate::screening::service::{LegacySource, ModelBundle, ScreeningService};

#[test]
fn score_returns_tier_and_breakdown() {
    let response = service().score(&baseline_record()).expect("scores");

    assert_eq!(response.score, 100);
    assert_eq!(response.risk_level, RiskLevel::Low);
    assert_eq!(response.breakdown.len(), 3);
}

#[test]
fn invalid_records_are_rejected_before_scoring() {
    let record = ApplicantRecord::new(f64::INFINITY, 1000.0, 0.0, 0.0);

    assert!(matches!(
        service().score(&record),
        Err(ScreeningError::InvalidInput {
            field: "monthly_income",
            ..
        })
    ));
    assert!(service().compare(&record).is_err());
}

#[test]
fn compare_reports_both_models_with_impact() {
    let report = service().compare(&baseline_record()).expect("compares");

    assert_eq!(report.new_model.score, 100);
    assert_eq!(report.new_model.impact.expected_annual_loss, 0.0);
    assert_eq!(report.new_model.breakdown.len(), 3);

    assert_eq!(report.legacy_model.model, "legacy_model");
    assert_close(report.legacy_model.score, 68.13);
    assert_close(report.legacy_model.impact.expected_missed_months, 0.96);
    assert_close(report.legacy_model.impact.expected_annual_loss, 956.1);
}

#[test]
fn audit_covers_both_models_at_configured_threshold() {
    let batch = vec![
        labeled("A", baseline_record()),
        labeled("A", baseline_record()),
        labeled("B", stretched_record()),
    ];
    let report = service().audit(&batch, None, None).expect("audits");

    assert_eq!(report.threshold, 50.0);
    let names: Vec<&str> = report.models.iter().map(|m| m.model.as_str()).collect();
    assert_eq!(names, vec!["new_model", "legacy_model"]);

    let fair = report.model("new_model").expect("fair audit");
    assert_eq!(fair.reference_group.as_deref(), Some("A"));
    assert_eq!(fair.adverse_impact_groups(), vec!["B"]);
}

#[test]
fn explicit_threshold_and_reference_override_defaults() {
    let svc = service().with_approval_threshold(80);
    assert_eq!(svc.approval_threshold(), 80.0);

    let batch = vec![labeled("A", baseline_record()), labeled("B", stretched_record())];
    let report = svc
        .audit(&batch, Some(30.0), Some("B".to_string()))
        .expect("audits");

    assert_eq!(report.threshold, 30.0);
    let fair = report.model("new_model").expect("fair audit");
    assert_eq!(fair.reference_group.as_deref(), Some("B"));
    assert_eq!(fair.group("A").and_then(|g| g.disparity_ratio), Some(1.0));
}

#[test]
fn approval_threshold_is_capped_at_one_hundred() {
    assert_eq!(service().with_approval_threshold(250).approval_threshold(), 100.0);
}

#[test]
fn reference_bundle_has_no_training_summary() {
    let svc = service();

    assert_eq!(svc.models().legacy_source, LegacySource::Reference);
    assert!(svc.models().training.is_none());
}

#[test]
fn bundle_trains_from_a_csv_table() {
    let mut buffer = Vec::new();
    write_training_rows(&mut buffer, &linear_training_rows(40)).expect("writes");

    let bundle = ModelBundle::from_training_reader(buffer.as_slice()).expect("trains");

    assert_eq!(bundle.legacy_source, LegacySource::Trained);
    let summary = bundle.training.expect("summary recorded");
    assert_eq!(summary.rows, 40);
    assert!(summary.r_squared > 0.999);
}

#[test]
fn bundle_rejects_an_unusable_table() {
    let result = ModelBundle::from_training_reader("credit_score,approved\n700,1\n".as_bytes());

    assert!(matches!(
        result,
        Err(ScreeningError::MissingTrainingData(_))
    ));
}

#[test]
fn concurrent_callers_share_one_bundle() {
    let svc = Arc::new(service());
    let expected = svc.compare(&stretched_record()).expect("compares");

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = Arc::clone(&svc);
                scope.spawn(move || svc.compare(&stretched_record()).expect("compares"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().expect("thread finished"), expected);
        }
    });
}

#[test]
fn features_and_impact_are_exposed_directly() {
    let svc = service();
    let features = svc.features(&baseline_record()).expect("features");

    assert_close(features.income_to_rent, 3.0);
    assert_eq!(svc.explain(&features).len(), 3);
    assert_close(svc.impact(0.0, 1000.0).expected_annual_loss, 3000.0);
}
