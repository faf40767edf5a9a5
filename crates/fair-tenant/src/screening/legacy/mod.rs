//! Backward-compatible credit-score-centric model kept for comparisons.

mod adapter;
mod model;
mod training;

pub use adapter::{adapt_to_legacy, LegacyFeatures, ASSUMED_CREDIT_SCORE, LEGACY_FEATURES};
pub use model::{ColumnScale, LegacyModel, LegacyScore, StandardScaler, LEGACY_MODEL_NAME};
pub use training::{
    fit_legacy_model, read_training_rows, write_training_rows, TrainingRow, TrainingSummary,
};
