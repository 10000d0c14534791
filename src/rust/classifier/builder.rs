use std::path::{Path, PathBuf};
use std::sync::Arc;
use log::info;

use super::classifier::SentimentClassifier;
use super::encoder::{HfTextEncoder, TextEncoder};
use super::engine::{InferenceEngine, OnnxEngine};
use super::error::ClassifierError;
use super::utils::labels_from_config;
use crate::{BuiltinModel, LabelSet, ModelManager, RuntimeConfig, ScoreInterpreter};

const MODEL_FILE: &str = "model.onnx";
const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";

/// A builder for constructing a [`SentimentClassifier`] with a fluent interface.
///
/// A classifier needs a text encoder and an inference engine, either loaded
/// from disk (`with_model`, `with_model_dir`, `with_custom_model`) or
/// supplied directly (`with_encoder`, `with_engine`). Labels come from, in
/// order of preference: `with_labels`, the model directory's `config.json`,
/// and finally `NEGATIVE` / `POSITIVE`.
#[derive(Default)]
pub struct SentimentClassifierBuilder {
    encoder: Option<Arc<dyn TextEncoder>>,
    engine: Option<Arc<dyn InferenceEngine>>,
    labels: Option<LabelSet>,
    config_labels: Option<LabelSet>,
    runtime_config: RuntimeConfig,
}

impl SentimentClassifierBuilder {
    /// Creates a new empty builder with default runtime configuration
    ///
    /// # Example
    /// ```
    /// use amygdala::SentimentClassifierBuilder;
    ///
    /// let builder = SentimentClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX model execution.
    ///
    /// Only affects models loaded after this call.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads a built-in model from the local cache.
    ///
    /// # Errors
    /// - `BuildError` if a model is already set
    /// - `BuildError` if the model has not been downloaded with
    ///   [`ModelManager::download_model`]
    /// - `BuildError` / `ModelError` if the files fail to load
    pub fn with_model(self, model: BuiltinModel) -> Result<Self, ClassifierError> {
        self.ensure_model_unset()?;

        let manager = ModelManager::new_default()
            .map_err(|e| ClassifierError::BuildError(format!("Failed to create model manager: {}", e)))?;
        let dir = manager.require_builtin(model)
            .map_err(|e| ClassifierError::BuildError(format!(
                "{}. Please download it first using ModelManager::download_model()", e
            )))?;

        self.load_dir(&dir, Some(model.characteristics().max_sequence_length))
    }

    /// Loads `model.onnx`, `tokenizer.json` and, when present, `config.json`
    /// from a directory.
    pub fn with_model_dir<P: AsRef<Path>>(self, dir: P) -> Result<Self, ClassifierError> {
        self.ensure_model_unset()?;
        self.load_dir(dir.as_ref(), None)
    }

    /// Sets a custom model and tokenizer path for the classifier
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `tokenizer_path` - Path to the tokenizer file
    /// * `max_sequence_length` - Optional maximum sequence length for the model,
    ///   defaulting to 512 tokens. Longer inputs are rejected.
    ///
    /// # Example
    /// ```no_run
    /// use amygdala::SentimentClassifierBuilder;
    ///
    /// let builder = SentimentClassifierBuilder::new()
    ///     .with_custom_model(
    ///         "path/to/model.onnx",
    ///         "path/to/tokenizer.json",
    ///         Some(256)
    ///     );
    /// ```
    pub fn with_custom_model(
        mut self,
        model_path: &str,
        tokenizer_path: &str,
        max_sequence_length: Option<usize>,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || tokenizer_path.is_empty() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths cannot be empty".to_string()));
        }
        self.ensure_model_unset()?;

        let encoder = HfTextEncoder::from_file(tokenizer_path, max_sequence_length)?;
        let engine = OnnxEngine::from_file(model_path, &self.runtime_config)?;

        self.encoder = Some(Arc::new(encoder));
        self.engine = Some(Arc::new(engine));
        Ok(self)
    }

    /// Uses the given encoder instead of loading a tokenizer from disk.
    pub fn with_encoder<E: TextEncoder + 'static>(mut self, encoder: E) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// Uses the given engine instead of loading a model from disk.
    pub fn with_engine<E: InferenceEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Overrides the class labels, in logit order.
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Builds and returns the final classifier.
    ///
    /// # Errors
    /// - `BuildError` if no encoder or no engine has been set
    pub fn build(self) -> Result<SentimentClassifier, ClassifierError> {
        let encoder = self.encoder
            .ok_or_else(|| ClassifierError::BuildError("No tokenizer loaded".into()))?;
        let engine = self.engine
            .ok_or_else(|| ClassifierError::BuildError("No ONNX model loaded".into()))?;

        let labels = self.labels
            .or(self.config_labels)
            .unwrap_or_else(LabelSet::binary_sentiment);
        info!("Classifier ready with labels {}", labels);

        Ok(SentimentClassifier {
            encoder,
            engine,
            interpreter: ScoreInterpreter::new(labels),
        })
    }

    fn ensure_model_unset(&self) -> Result<(), ClassifierError> {
        if self.encoder.is_some() || self.engine.is_some() {
            return Err(ClassifierError::BuildError("Model and tokenizer already set".to_string()));
        }
        Ok(())
    }

    fn load_dir(mut self, dir: &Path, max_sequence_length: Option<usize>) -> Result<Self, ClassifierError> {
        let model_path: PathBuf = dir.join(MODEL_FILE);
        let tokenizer_path: PathBuf = dir.join(TOKENIZER_FILE);
        let config_path: PathBuf = dir.join(CONFIG_FILE);

        let encoder = HfTextEncoder::from_file(&tokenizer_path, max_sequence_length)?;
        let engine = OnnxEngine::from_file(&model_path, &self.runtime_config)?;

        if config_path.exists() {
            let labels = labels_from_config(&config_path)?;
            info!("Loaded labels {} from {}", labels, config_path.display());
            self.config_labels = Some(labels);
        }

        self.encoder = Some(Arc::new(encoder));
        self.engine = Some(Arc::new(engine));
        Ok(self)
    }
}
