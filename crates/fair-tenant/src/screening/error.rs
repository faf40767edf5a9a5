/// Failures surfaced by the screening core and its data collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
    #[error("legacy model could not be initialized: {0}")]
    MissingTrainingData(String),
    #[error("unsupported audit batch: {0}")]
    UnsupportedFormat(String),
}
