use serde::{Deserialize, Serialize};

use super::adapter::{adapt_to_legacy, LegacyFeatures, NUMERIC_COLUMNS};
use crate::screening::domain::ApplicantRecord;
use crate::screening::impact::round2;
use crate::screening::scoring::ScoringModel;

/// Per-column standardization fitted on the training table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub index: usize,
    pub mean: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<ColumnScale>,
}

impl StandardScaler {
    /// Fit population mean and standard deviation for the numeric columns.
    /// A constant column keeps a scale of 1 so transform never divides by zero.
    pub fn fit(rows: &[[f64; 8]]) -> Self {
        let n = rows.len().max(1) as f64;
        let columns = NUMERIC_COLUMNS
            .iter()
            .map(|&index| {
                let mean = rows.iter().map(|row| row[index]).sum::<f64>() / n;
                let variance = rows
                    .iter()
                    .map(|row| (row[index] - mean).powi(2))
                    .sum::<f64>()
                    / n;
                let std = variance.sqrt();
                ColumnScale {
                    index,
                    mean,
                    scale: if std > f64::EPSILON { std } else { 1.0 },
                }
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnScale] {
        &self.columns
    }

    pub fn transform(&self, mut row: [f64; 8]) -> [f64; 8] {
        for column in &self.columns {
            row[column.index] = (row[column.index] - column.mean) / column.scale;
        }
        row
    }
}

/// Score returned by the legacy path, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyScore {
    pub score: f64,
    pub model: String,
}

pub const LEGACY_MODEL_NAME: &str = "legacy_model";

/// Linear regressor over [`LegacyFeatures`], rescaled onto 0-100 using the
/// range of the training target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyModel {
    pub(crate) scaler: StandardScaler,
    pub(crate) intercept: f64,
    pub(crate) coefficients: [f64; 8],
    pub(crate) target_min: f64,
    pub(crate) target_max: f64,
}

impl LegacyModel {
    /// Hand-set coefficients mirroring the biased approval formula, used when
    /// no training table is configured. Inputs are left unscaled.
    pub fn reference() -> Self {
        Self {
            scaler: StandardScaler::default(),
            intercept: -1.8,
            coefficients: [0.003, 0.05, -0.2, -0.2, -0.15, 0.05, 0.1, 0.03],
            target_min: 1.5,
            target_max: 6.5,
        }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64; 8] {
        &self.coefficients
    }

    pub fn predict_raw(&self, features: &LegacyFeatures) -> f64 {
        let scaled = self.scaler.transform(features.values());
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled.iter())
                .map(|(coefficient, value)| coefficient * value)
                .sum::<f64>()
    }

    pub fn score_features(&self, features: &LegacyFeatures) -> LegacyScore {
        let span = self.target_max - self.target_min;
        let score = if span > 0.0 {
            ((self.predict_raw(features) - self.target_min) / span * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        LegacyScore {
            score: round2(score),
            model: LEGACY_MODEL_NAME.to_string(),
        }
    }

    pub fn score(&self, record: &ApplicantRecord) -> LegacyScore {
        self.score_features(&adapt_to_legacy(record))
    }
}

impl ScoringModel for LegacyModel {
    fn name(&self) -> &str {
        LEGACY_MODEL_NAME
    }

    fn score_record(&self, record: &ApplicantRecord) -> f64 {
        self.score(record).score
    }
}
