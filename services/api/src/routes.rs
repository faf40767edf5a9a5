use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use fair_tenant::screening::legacy::{LEGACY_FEATURES, LEGACY_MODEL_NAME};
use fair_tenant::screening::{screening_router, LegacySource, ScreeningService, TrainingSummary};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Provenance of the model bundle the server is scoring with.
#[derive(Debug, Serialize)]
pub(crate) struct ModelInfoResponse {
    pub(crate) fair_model: &'static str,
    pub(crate) legacy_model: &'static str,
    pub(crate) legacy_source: LegacySource,
    pub(crate) training: Option<TrainingSummary>,
    pub(crate) legacy_intercept: f64,
    pub(crate) legacy_coefficients: BTreeMap<&'static str, f64>,
    pub(crate) approval_threshold: f64,
    pub(crate) built_at: DateTime<Utc>,
    pub(crate) age_seconds: i64,
}

pub(crate) fn with_screening_routes(service: Arc<ScreeningService>) -> axum::Router {
    screening_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/model", axum::routing::get(model_info_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn model_info_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<ModelInfoResponse> {
    let service = &state.screening;
    let bundle = service.models();

    Json(ModelInfoResponse {
        fair_model: "new_model",
        legacy_model: LEGACY_MODEL_NAME,
        legacy_source: bundle.legacy_source,
        training: bundle.training,
        legacy_intercept: bundle.legacy.intercept(),
        legacy_coefficients: LEGACY_FEATURES
            .iter()
            .copied()
            .zip(bundle.legacy.coefficients().iter().copied())
            .collect(),
        approval_threshold: service.approval_threshold(),
        built_at: bundle.built_at,
        age_seconds: (Utc::now() - bundle.built_at).num_seconds(),
    })
}
