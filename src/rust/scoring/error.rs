use thiserror::Error;

/// Errors raised while turning raw logits into a prediction.
///
/// Every variant is terminal for the call that produced it. Nothing is
/// cached between calls, so retrying with corrected input is always safe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The logit vector is too short or holds a NaN / infinite value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The number of logits does not match the number of labels
    #[error("Dimension mismatch: got {logits} logits for {labels} labels")]
    DimensionMismatch { logits: usize, labels: usize },
    /// The label set is too small, has an empty label or repeats a label
    #[error("Invalid label set: {0}")]
    InvalidLabelSet(String),
}
