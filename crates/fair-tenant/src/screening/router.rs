use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::audit::LabeledApplicant;
use super::batch::parse_audit_batch;
use super::domain::{ApplicantRecord, FeatureName};
use super::error::ScreeningError;
use super::service::ScreeningService;
use crate::error::AppError;

/// Router builder exposing the scoring, comparison and audit endpoints.
pub fn screening_router(service: Arc<ScreeningService>) -> Router {
    Router::new()
        .route("/api/", get(root_handler))
        .route("/api/score", post(score_handler))
        .route("/api/score/compare", post(compare_handler))
        .route("/api/audit", post(audit_handler))
        .with_state(service)
}

/// Audit payload: applicants inline, or a CSV table in `csv`.
#[derive(Debug, Default, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub reference_group: Option<String>,
    #[serde(default)]
    pub applicants: Vec<LabeledApplicant>,
    #[serde(default)]
    pub csv: Option<String>,
}

pub(crate) async fn root_handler() -> Json<serde_json::Value> {
    let features: Vec<&str> = FeatureName::ALL.iter().map(|name| name.key()).collect();
    Json(json!({
        "status": "ok",
        "message": "Fair Tenant Screening",
        "features": features,
    }))
}

pub(crate) async fn score_handler(
    State(service): State<Arc<ScreeningService>>,
    Json(record): Json<ApplicantRecord>,
) -> Response {
    match service.score(&record) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn compare_handler(
    State(service): State<Arc<ScreeningService>>,
    Json(record): Json<ApplicantRecord>,
) -> Response {
    match service.compare(&record) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn audit_handler(
    State(service): State<Arc<ScreeningService>>,
    Json(request): Json<AuditRequest>,
) -> Response {
    let AuditRequest {
        threshold,
        reference_group,
        applicants,
        csv,
    } = request;

    let batch = match csv {
        Some(table) => match parse_audit_batch(Cursor::new(table.into_bytes())) {
            Ok(batch) => batch,
            Err(err) => return error_response(err),
        },
        None if applicants.is_empty() => {
            return error_response(ScreeningError::UnsupportedFormat(
                "expected `applicants` or a `csv` table".to_string(),
            ))
        }
        None => applicants,
    };

    match service.audit(&batch, threshold, reference_group) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: ScreeningError) -> Response {
    AppError::from(err).into_response()
}
