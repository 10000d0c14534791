use ort::Error as OrtError;
use thiserror::Error;

use crate::model_manager::ModelError;
use crate::scoring::ScoreError;

/// Represents the different types of errors that can occur in the sentiment pipeline.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Error occurred while loading or using the tokenizer
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
    /// Error occurred while loading or running the ONNX model
    #[error("Model error: {0}")]
    ModelError(String),
    /// Error occurred during the build phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The model output could not be turned into a prediction
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoreError),
}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}

impl From<ModelError> for ClassifierError {
    fn from(err: ModelError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}
