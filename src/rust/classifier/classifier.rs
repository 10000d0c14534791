use std::sync::Arc;

use log::debug;

use super::encoder::TextEncoder;
use super::engine::{InferenceEngine, ModelMetadata};
use super::error::ClassifierError;
use crate::scoring::{ClassificationResult, LabelSet, ScoreError, ScoreInterpreter};

/// A thread-safe sentiment classifier: tokenizer, model and score
/// interpretation behind a single `predict` call.
///
/// # Thread Safety
///
/// The collaborators are `Send + Sync` trait objects held in `Arc`, and
/// [`ScoreInterpreter`] is immutable, so a classifier can be shared across
/// threads with `Arc<SentimentClassifier>`.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use amygdala::SentimentClassifier;
///
/// let classifier = SentimentClassifier::builder()
///     .with_model_dir("distilbert_onnx")?
///     .build()?;
///
/// let result = classifier.predict("I don't like this.")?;
/// println!("Predicted sentiment: {} ({:.2}%)", result.label, result.confidence * 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SentimentClassifier {
    pub(crate) encoder: Arc<dyn TextEncoder>,
    pub(crate) engine: Arc<dyn InferenceEngine>,
    pub(crate) interpreter: ScoreInterpreter,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<SentimentClassifier>();
    }
};

impl SentimentClassifier {
    /// Creates a new builder for fluent construction
    pub fn builder() -> super::builder::SentimentClassifierBuilder {
        super::builder::SentimentClassifierBuilder::new()
    }

    /// Returns information about the classifier's configuration
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.interpreter.num_classes(),
            labels: self.interpreter.labels().clone(),
            metadata: self.engine.metadata(),
        }
    }

    pub fn labels(&self) -> &LabelSet {
        self.interpreter.labels()
    }

    pub fn metadata(&self) -> ModelMetadata {
        self.engine.metadata()
    }

    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.encoder.count_tokens(text)
    }

    /// Classifies a single text.
    ///
    /// # Errors
    /// - `ValidationError` if `text` is empty or too long for the model
    /// - `TokenizerError` / `ModelError` from the collaborators
    /// - `Scoring(DimensionMismatch)` if the model emits a different number
    ///   of logits than there are labels
    /// - `Scoring(InvalidInput)` if the model emits a non-finite logit
    pub fn predict(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        if text.is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let input = self.encoder.encode(text)?;
        debug!("Encoded input into {} tokens", input.len());

        let logits = self.engine.run(&input)?;
        debug!("Model returned logits {:?}", logits);

        self.interpreter.classify(&logits).map_err(|e| {
            if let ScoreError::DimensionMismatch { logits, labels } = &e {
                log::error!(
                    "Model produced {} logits but {} labels are configured; check the label set",
                    logits, labels
                );
            }
            ClassifierError::from(e)
        })
    }

    /// Classifies each text independently, stopping at the first failure.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<ClassificationResult>, ClassifierError> {
        texts.iter().map(|t| self.predict(t.as_ref())).collect()
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("labels", self.interpreter.labels())
            .finish_non_exhaustive()
    }
}
