use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::screening::audit::LabeledApplicant;
use crate::screening::domain::ApplicantRecord;
use crate::screening::legacy::TrainingRow;
use crate::screening::scoring::ScoringModel;
use crate::screening::service::{ModelBundle, ScreeningService};

/// income=3000, rent=1000, savings=3000, debt=500, no history.
pub(super) fn baseline_record() -> ApplicantRecord {
    ApplicantRecord::new(3000.0, 1000.0, 3000.0, 500.0)
}

/// Rent-burdened applicant with no savings and income barely above rent.
pub(super) fn stretched_record() -> ApplicantRecord {
    ApplicantRecord::new(1500.0, 1000.0, 500.0, 200.0)
}

pub(super) fn empty_record() -> ApplicantRecord {
    ApplicantRecord::new(0.0, 0.0, 0.0, 0.0)
}

pub(super) fn labeled(group: &str, record: ApplicantRecord) -> LabeledApplicant {
    LabeledApplicant {
        group: group.to_string(),
        record,
    }
}

pub(super) fn service() -> ScreeningService {
    ScreeningService::new(Arc::new(ModelBundle::reference()))
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// Scores an applicant by their monthly income so audit tests can pick exact
/// scores per record.
pub(super) struct IncomeAsScore;

impl ScoringModel for IncomeAsScore {
    fn name(&self) -> &str {
        "income_as_score"
    }

    fn score_record(&self, record: &ApplicantRecord) -> f64 {
        record.monthly_income
    }
}

/// Rows whose target is an exact linear function of the legacy columns.
pub(super) fn linear_training_rows(count: usize) -> Vec<TrainingRow> {
    (0..count)
        .map(|i| {
            let credit_score = 500.0 + ((i * 37) % 300) as f64;
            let income_stability = ((i * 13) % 100) as f64;
            let eviction_history = (i % 2) as f64;
            let criminal_history = ((i / 3) % 2) as f64;
            let voucher = ((i / 5) % 2) as f64;
            let employment_years = ((i * 7) % 11) as f64;
            let savings_ratio = ((i * 3) % 10) as f64 / 10.0;
            let rental_history_years = ((i * 11) % 17) as f64;

            TrainingRow {
                credit_score,
                income_stability,
                eviction_history,
                criminal_history,
                voucher,
                employment_years,
                savings_ratio,
                rental_history_years,
                approved: linear_target(
                    credit_score,
                    income_stability,
                    eviction_history,
                    employment_years,
                ),
            }
        })
        .collect()
}

pub(super) fn linear_target(
    credit_score: f64,
    income_stability: f64,
    eviction_history: f64,
    employment_years: f64,
) -> f64 {
    1.0 + 0.004 * credit_score + 0.03 * income_stability - 0.5 * eviction_history
        + 0.1 * employment_years
}

pub(super) fn json_request(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("payload serializes")))
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
