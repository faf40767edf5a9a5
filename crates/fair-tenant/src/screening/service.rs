use std::io::Read;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::audit::{run_audit, AuditConfig, AuditReport, LabeledApplicant};
use super::domain::{ApplicantRecord, ExplanationEntry, FeatureVector, ImpactEstimate, RiskLevel};
use super::error::ScreeningError;
use super::explain::explain_features;
use super::features::compute_features;
use super::impact::calculate_impact;
use super::legacy::{fit_legacy_model, read_training_rows, LegacyModel, TrainingRow, TrainingSummary};
use super::policy::DEFAULT_APPROVAL_THRESHOLD;
use super::scoring::{FairScorer, ScoringModel};

/// Where the legacy coefficients came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacySource {
    Reference,
    Trained,
}

/// Immutable scoring state built once at startup and shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    pub fair: FairScorer,
    pub legacy: LegacyModel,
    pub legacy_source: LegacySource,
    pub training: Option<TrainingSummary>,
    pub built_at: DateTime<Utc>,
}

impl ModelBundle {
    /// Fixed fair weights with the hand-set legacy coefficients.
    pub fn reference() -> Self {
        Self {
            fair: FairScorer::default(),
            legacy: LegacyModel::reference(),
            legacy_source: LegacySource::Reference,
            training: None,
            built_at: Utc::now(),
        }
    }

    pub fn from_training_rows(rows: &[TrainingRow]) -> Result<Self, ScreeningError> {
        let (legacy, summary) = fit_legacy_model(rows)?;
        info!(
            rows = summary.rows,
            r_squared = summary.r_squared,
            "legacy model trained"
        );

        Ok(Self {
            fair: FairScorer::default(),
            legacy,
            legacy_source: LegacySource::Trained,
            training: Some(summary),
            built_at: Utc::now(),
        })
    }

    pub fn from_training_reader<R: Read>(reader: R) -> Result<Self, ScreeningError> {
        let rows = read_training_rows(reader)?;
        Self::from_training_rows(&rows)
    }
}

/// Score, tier and breakdown returned for one applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub breakdown: Vec<ExplanationEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewModelComparison {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub breakdown: Vec<ExplanationEntry>,
    pub impact: ImpactEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyModelComparison {
    pub score: f64,
    pub model: String,
    pub impact: ImpactEstimate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub new_model: NewModelComparison,
    pub legacy_model: LegacyModelComparison,
}

/// Facade over the scoring pipeline. Cheap to clone; every clone shares the
/// same model bundle.
#[derive(Debug, Clone)]
pub struct ScreeningService {
    models: Arc<ModelBundle>,
    approval_threshold: f64,
}

impl ScreeningService {
    pub fn new(models: Arc<ModelBundle>) -> Self {
        Self {
            models,
            approval_threshold: f64::from(DEFAULT_APPROVAL_THRESHOLD),
        }
    }

    pub fn with_approval_threshold(mut self, threshold: u8) -> Self {
        self.approval_threshold = f64::from(threshold.min(100));
        self
    }

    pub fn models(&self) -> &ModelBundle {
        &self.models
    }

    pub fn approval_threshold(&self) -> f64 {
        self.approval_threshold
    }

    pub fn features(&self, record: &ApplicantRecord) -> Result<FeatureVector, ScreeningError> {
        compute_features(record)
    }

    pub fn score(&self, record: &ApplicantRecord) -> Result<ScoreResponse, ScreeningError> {
        let features = compute_features(record)?;
        let result = self.models.fair.score(&features);
        debug!(score = result.score, risk = result.risk_level.label(), "applicant scored");

        Ok(ScoreResponse {
            score: result.score,
            risk_level: result.risk_level,
            breakdown: self.explain(&features),
        })
    }

    pub fn explain(&self, features: &FeatureVector) -> Vec<ExplanationEntry> {
        explain_features(features)
    }

    pub fn impact(&self, score: f64, monthly_rent: f64) -> ImpactEstimate {
        calculate_impact(score, monthly_rent)
    }

    pub fn compare(&self, record: &ApplicantRecord) -> Result<ComparisonReport, ScreeningError> {
        let features = compute_features(record)?;
        let rent = record.monthly_rent;

        let fair = self.models.fair.score(&features);
        let legacy = self.models.legacy.score(record);
        debug!(
            new_score = fair.score,
            legacy_score = legacy.score,
            "models compared"
        );

        Ok(ComparisonReport {
            new_model: NewModelComparison {
                score: fair.score,
                risk_level: fair.risk_level,
                breakdown: self.explain(&features),
                impact: self.impact(f64::from(fair.score), rent),
            },
            legacy_model: LegacyModelComparison {
                impact: self.impact(legacy.score, rent),
                score: legacy.score,
                model: legacy.model,
            },
        })
    }

    /// Audit both models over the batch. `threshold` falls back to the
    /// service's configured approval threshold.
    pub fn audit(
        &self,
        batch: &[LabeledApplicant],
        threshold: Option<f64>,
        reference_group: Option<String>,
    ) -> Result<AuditReport, ScreeningError> {
        let config = AuditConfig {
            threshold: threshold.unwrap_or(self.approval_threshold),
            reference_group,
        };
        let models: [&dyn ScoringModel; 2] = [&self.models.fair, &self.models.legacy];
        let report = run_audit(batch, &models, &config)?;

        info!(
            applicants = report.applicants,
            threshold = report.threshold,
            "disparity audit completed"
        );
        Ok(report)
    }
}
