use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::info;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use serde::Serialize;

use super::encoder::EncodedInput;
use super::error::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Name and type description of one model input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorInfo {
    pub name: String,
    pub description: String,
}

/// Input and output signature of a loaded model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub inputs: Vec<TensorInfo>,
    pub outputs: Vec<TensorInfo>,
}

impl fmt::Display for ModelMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Inputs:")?;
        for input in &self.inputs {
            writeln!(f, "  {} : {}", input.name, input.description)?;
        }
        writeln!(f)?;
        writeln!(f, "Model Outputs:")?;
        for output in &self.outputs {
            writeln!(f, "  {} : {}", output.name, output.description)?;
        }
        Ok(())
    }
}

/// Runs a sequence-classification model on encoded text.
pub trait InferenceEngine: Send + Sync {
    /// Returns one raw logit per class.
    fn run(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError>;

    fn metadata(&self) -> ModelMetadata;
}

/// [`InferenceEngine`] backed by an ONNX Runtime session.
///
/// The model is expected to:
/// - Accept `input_ids` and `attention_mask`, both `i64` of shape `[1, sequence_length]`
/// - Produce logits as its first output, shaped `[1, num_classes]` or `[num_classes]`
#[derive(Debug)]
pub struct OnnxEngine {
    session: Session,
}

impl OnnxEngine {
    pub fn from_file<P: AsRef<Path>>(path: P, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", path.display())));
        }
        let session = create_session_builder(config)?
            .commit_from_file(path)?;
        Self::from_session(session)
    }

    pub fn from_session(session: Session) -> Result<Self, ClassifierError> {
        Self::validate_model(&session)?;
        info!("Model structure validated successfully");
        Ok(Self { session })
    }

    /// Checks that the model has the two text inputs and at least one output.
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if inputs.len() < 2 {
            return Err(ClassifierError::ModelError(
                format!("Model must have at least 2 inputs (input_ids and attention_mask), found {}", inputs.len())
            ));
        }

        if session.outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for logits".to_string()
            ));
        }

        Ok(())
    }

    fn to_tensor(values: &[u32], name: &str) -> Result<Tensor<i64>, ClassifierError> {
        let array = Array2::from_shape_vec((1, values.len()), values.iter().map(|&x| x as i64).collect())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} array: {}", name, e)))?;
        let array = array.into_dyn();
        Tensor::from_array(&array.as_standard_layout())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create {} tensor: {}", name, e)))
    }
}

impl InferenceEngine for OnnxEngine {
    fn run(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        let mut input_tensors = HashMap::new();
        input_tensors.insert("input_ids", Self::to_tensor(input.token_ids(), "input_ids")?);
        input_tensors.insert("attention_mask", Self::to_tensor(input.attention_mask(), "attention_mask")?);

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?;

        let shape = output_tensor.shape();
        match shape {
            [_] | [1, _] => Ok(output_tensor.iter().copied().collect()),
            other => Err(ClassifierError::ModelError(format!(
                "Expected logits of shape [1, num_classes], got {:?}",
                other
            ))),
        }
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            inputs: self.session.inputs.iter()
                .map(|i| TensorInfo { name: i.name.clone(), description: format!("{:?}", i.input_type) })
                .collect(),
            outputs: self.session.outputs.iter()
                .map(|o| TensorInfo { name: o.name.clone(), description: format!("{:?}", o.output_type) })
                .collect(),
        }
    }
}
