//! Fitting the legacy regressor from a tabular training set.
//!
//! Numeric columns are standardized, then ordinary least squares with an
//! intercept column is solved through SVD. The design matrix is tall and can be
//! rank deficient (a binary column that never fires), so the solve retries with
//! progressively looser singular value tolerances.

use std::io::{Read, Write};

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::adapter::{LegacyFeatures, LEGACY_FEATURES};
use super::model::{LegacyModel, StandardScaler};
use crate::screening::error::ScreeningError;

const TARGET_COLUMN: &str = "approved";

/// One labelled row of the legacy training table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub credit_score: f64,
    pub income_stability: f64,
    pub eviction_history: f64,
    pub criminal_history: f64,
    pub voucher: f64,
    pub employment_years: f64,
    pub savings_ratio: f64,
    pub rental_history_years: f64,
    pub approved: f64,
}

impl TrainingRow {
    pub fn from_features(features: &LegacyFeatures, approved: f64) -> Self {
        Self {
            credit_score: features.credit_score,
            income_stability: features.income_stability,
            eviction_history: f64::from(features.eviction_history),
            criminal_history: f64::from(features.criminal_history),
            voucher: f64::from(features.voucher),
            employment_years: features.employment_years,
            savings_ratio: features.savings_ratio,
            rental_history_years: features.rental_history_years,
            approved,
        }
    }

    fn values(&self) -> [f64; 8] {
        [
            self.credit_score,
            self.income_stability,
            self.eviction_history,
            self.criminal_history,
            self.voucher,
            self.employment_years,
            self.savings_ratio,
            self.rental_history_years,
        ]
    }
}

/// Fit quality on the training rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub r_squared: f64,
    pub mean_squared_error: f64,
    pub target_min: f64,
    pub target_max: f64,
}

pub fn read_training_rows<R: Read>(reader: R) -> Result<Vec<TrainingRow>, ScreeningError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(training_error)?.clone();
    let missing: Vec<&str> = LEGACY_FEATURES
        .iter()
        .copied()
        .chain(std::iter::once(TARGET_COLUMN))
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(ScreeningError::MissingTrainingData(format!(
            "training table is missing columns: {}",
            missing.join(", ")
        )));
    }

    csv_reader
        .deserialize::<TrainingRow>()
        .map(|row| row.map_err(training_error))
        .collect()
}

pub fn write_training_rows<W: Write>(writer: W, rows: &[TrainingRow]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn training_error(err: csv::Error) -> ScreeningError {
    ScreeningError::MissingTrainingData(format!("invalid training data: {err}"))
}

pub fn fit_legacy_model(
    rows: &[TrainingRow],
) -> Result<(LegacyModel, TrainingSummary), ScreeningError> {
    if rows.is_empty() {
        return Err(ScreeningError::MissingTrainingData(
            "training data contains no rows".to_string(),
        ));
    }

    let raw: Vec<[f64; 8]> = rows.iter().map(TrainingRow::values).collect();
    if raw.iter().flatten().any(|value| !value.is_finite()) {
        return Err(ScreeningError::MissingTrainingData(
            "training data contains non-finite values".to_string(),
        ));
    }

    let targets: Vec<f64> = rows.iter().map(|row| row.approved).collect();
    let target_min = targets.iter().copied().fold(f64::INFINITY, f64::min);
    let target_max = targets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if target_max <= target_min {
        return Err(ScreeningError::MissingTrainingData(
            "approval target has no spread".to_string(),
        ));
    }

    let scaler = StandardScaler::fit(&raw);
    let n = rows.len();
    let mut design = DMatrix::<f64>::zeros(n, 9);
    for (i, row) in raw.iter().enumerate() {
        design[(i, 0)] = 1.0;
        for (j, value) in scaler.transform(*row).iter().enumerate() {
            design[(i, j + 1)] = *value;
        }
    }
    let y = DVector::from_column_slice(&targets);

    let beta = solve_least_squares(&design, &y).ok_or_else(|| {
        ScreeningError::MissingTrainingData("least squares fit did not converge".to_string())
    })?;

    let mut coefficients = [0.0; 8];
    for (j, coefficient) in coefficients.iter_mut().enumerate() {
        *coefficient = beta[j + 1];
    }

    let model = LegacyModel {
        scaler,
        intercept: beta[0],
        coefficients,
        target_min,
        target_max,
    };

    let predictions = &design * &beta;
    let mean_target = targets.iter().sum::<f64>() / n as f64;
    let ss_res: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(prediction, target)| (target - prediction).powi(2))
        .sum();
    let ss_tot: f64 = targets
        .iter()
        .map(|target| (target - mean_target).powi(2))
        .sum();

    let summary = TrainingSummary {
        rows: n,
        r_squared: 1.0 - ss_res / ss_tot,
        mean_squared_error: ss_res / n as f64,
        target_min,
        target_max,
    };
    debug!(
        rows = summary.rows,
        r_squared = summary.r_squared,
        mse = summary.mean_squared_error,
        "legacy model fitted"
    );

    Ok((model, summary))
}

fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
