use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, FeatureName, FeatureVector, RiskLevel, ScoreResult};
use super::features;
use super::policy::{LOW_RISK_SCORE, MEDIUM_RISK_SCORE, WEIGHTS};

/// Anything the disparity auditor can run over a batch of applicants.
pub trait ScoringModel: Send + Sync {
    fn name(&self) -> &str;

    /// Score on the 0-100 scale for an already validated record.
    fn score_record(&self, record: &ApplicantRecord) -> f64;
}

/// Fixed-weight linear scorer over the engineered features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairScorer {
    weights: Vec<(FeatureName, f64)>,
}

impl Default for FairScorer {
    fn default() -> Self {
        Self::new(WEIGHTS.to_vec())
    }
}

impl FairScorer {
    pub fn new(weights: Vec<(FeatureName, f64)>) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &[(FeatureName, f64)] {
        &self.weights
    }

    /// Sum of weighted features; absent features contribute nothing.
    pub fn weighted_total(&self, features: &FeatureVector) -> f64 {
        self.weights
            .iter()
            .filter_map(|(name, weight)| features.get(*name).map(|value| weight * value))
            .sum()
    }

    pub fn score(&self, features: &FeatureVector) -> ScoreResult {
        let total = self.weighted_total(features);
        let score = (total * 100.0).round().clamp(0.0, 100.0) as u8;

        ScoreResult {
            score,
            risk_level: risk_level_for(score),
        }
    }
}

impl ScoringModel for FairScorer {
    fn name(&self) -> &str {
        "new_model"
    }

    fn score_record(&self, record: &ApplicantRecord) -> f64 {
        let features = features::derive(record);
        f64::from(self.score(&features).score)
    }
}

pub fn risk_level_for(score: u8) -> RiskLevel {
    if score >= LOW_RISK_SCORE {
        RiskLevel::Low
    } else if score >= MEDIUM_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
