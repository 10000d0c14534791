//! Numerically stable sentiment scoring for ONNX text-classification models.
//!
//! The heart of the crate is [`ScoreInterpreter`]: it turns the raw logits a
//! classification model emits into a probability distribution and a single
//! label. Around it, [`SentimentClassifier`] wires a Hugging Face tokenizer
//! and an ONNX Runtime session into a one-call text → label pipeline.
//!
//! # Scoring logits
//!
//! ```rust
//! use amygdala::{classify, LabelSet, ScoreInterpreter};
//!
//! let result = classify(&[-2.0, 2.0], &["NEGATIVE", "POSITIVE"]).unwrap();
//! assert_eq!(result.label, "POSITIVE");
//!
//! // Reuse one validated label set for many calls
//! let interpreter = ScoreInterpreter::new(LabelSet::binary_sentiment());
//! let result = interpreter.classify(&[1000.0_f32, 1.0]).unwrap();
//! assert_eq!(result.label, "NEGATIVE");
//! assert!(result.confidence > 0.999_999);
//! ```
//!
//! # Classifying text
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use amygdala::SentimentClassifier;
//!
//! let classifier = SentimentClassifier::builder()
//!     .with_model_dir("distilbert_onnx")?
//!     .build()?;
//!
//! let result = classifier.predict("I don't like this.")?;
//! for (label, p) in result.scores(classifier.labels()) {
//!     println!("{}: {:.2}%", label, p * 100.0);
//! }
//! println!("Predicted sentiment: {}", result.label);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! Scoring is a pure function of its inputs. `SentimentClassifier` is
//! `Send + Sync` and can be shared across threads with `Arc`.

pub mod classifier;
pub mod scoring;
mod runtime;
pub mod model_manager;
pub mod models;

pub use classifier::{
    ClassifierError, ClassifierInfo, EncodedInput, HfTextEncoder, InferenceEngine, ModelMetadata,
    OnnxEngine, SentimentClassifier, SentimentClassifierBuilder, TensorInfo, TextEncoder,
};
pub use scoring::{
    classify, softmax, ClassificationResult, LabelSet, ProbabilityDistribution, ScoreError,
    ScoreInterpreter,
};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use ort::session::builder::GraphOptimizationLevel;
pub use model_manager::{ModelManager, ModelError};
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo};

/// Initialises `env_logger`. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::try_init();
}
