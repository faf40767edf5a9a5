use fair_tenant::config::AppConfig;
use fair_tenant::error::AppError;
use fair_tenant::screening::{ModelBundle, ScreeningService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) screening: Arc<ScreeningService>,
}

/// Fit the legacy model from `training_data`, or fall back to the reference
/// coefficients when no table is configured.
pub(crate) fn load_model_bundle(training_data: Option<&Path>) -> Result<ModelBundle, AppError> {
    match training_data {
        Some(path) => {
            info!(path = %path.display(), "training legacy model");
            let reader = BufReader::new(File::open(path)?);
            Ok(ModelBundle::from_training_reader(reader)?)
        }
        None => {
            warn!("no legacy training table configured; using reference coefficients");
            Ok(ModelBundle::reference())
        }
    }
}

/// Screening service for one-shot CLI commands. `training_data` takes
/// precedence over `APP_TRAINING_DATA`.
pub(crate) fn build_service(training_data: Option<PathBuf>) -> Result<ScreeningService, AppError> {
    let config = AppConfig::load()?;
    let training_data = training_data.or(config.screening.training_data);
    let bundle = load_model_bundle(training_data.as_deref())?;

    Ok(ScreeningService::new(Arc::new(bundle))
        .with_approval_threshold(config.screening.approval_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fair_tenant::screening::{LegacySource, ScreeningError};

    #[test]
    fn missing_table_path_uses_reference_bundle() {
        let bundle = load_model_bundle(None).expect("reference bundle");
        assert_eq!(bundle.legacy_source, LegacySource::Reference);
    }

    #[test]
    fn unreadable_table_is_an_io_error() {
        let result = load_model_bundle(Some(Path::new("/nonexistent/legacy.csv")));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn malformed_table_is_a_training_error() {
        let path = std::env::temp_dir().join(format!(
            "fair-tenant-api-{}-training.csv",
            std::process::id()
        ));
        std::fs::write(&path, "credit_score,approved\n700,1\n").expect("fixture written");

        let result = load_model_bundle(Some(&path));
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            result,
            Err(AppError::Screening(ScreeningError::MissingTrainingData(_)))
        ));
    }
}
