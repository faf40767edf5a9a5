use crate::cli::ServeArgs;
use crate::infra::{load_model_bundle, AppState};
use crate::routes::with_screening_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fair_tenant::config::AppConfig;
use fair_tenant::error::AppError;
use fair_tenant::screening::ScreeningService;
use fair_tenant::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.training_data.take() {
        config.screening.training_data = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let bundle = load_model_bundle(config.screening.training_data.as_deref())?;
    info!(
        legacy_source = ?bundle.legacy_source,
        built_at = %bundle.built_at,
        "model bundle loaded"
    );
    let screening = Arc::new(
        ScreeningService::new(Arc::new(bundle))
            .with_approval_threshold(config.screening.approval_threshold),
    );

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        screening: screening.clone(),
    };

    let app = with_screening_routes(screening)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "fair tenant screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
