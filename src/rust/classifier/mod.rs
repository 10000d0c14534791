mod error;
mod encoder;
mod engine;
mod classifier;
pub mod builder;
mod utils;

pub use error::ClassifierError;
pub use encoder::{EncodedInput, HfTextEncoder, TextEncoder, DEFAULT_MAX_SEQUENCE_LENGTH};
pub use engine::{InferenceEngine, ModelMetadata, OnnxEngine, TensorInfo};
pub use classifier::SentimentClassifier;
pub use builder::SentimentClassifierBuilder;

use crate::scoring::LabelSet;

/// Information about the current configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the model distinguishes
    pub num_classes: usize,
    /// Labels of the classes, in logit order
    pub labels: LabelSet,
    /// Input and output signature of the underlying model
    pub metadata: ModelMetadata,
}
