use amygdala::{
    ClassifierError, EncodedInput, InferenceEngine, LabelSet, ModelMetadata, ScoreError,
    SentimentClassifier, TensorInfo, TextEncoder,
};
use std::sync::Arc;
use std::thread;

/// Maps each whitespace-separated word to a token id; padding id is 0.
struct WordEncoder;

impl TextEncoder for WordEncoder {
    fn encode(&self, text: &str) -> Result<EncodedInput, ClassifierError> {
        let mut ids = vec![101];
        ids.extend(text.split_whitespace().map(|w| w.len() as u32 + 1000));
        ids.push(102);
        ids.resize(ids.len().max(16), 0);
        let mask = ids.iter().map(|&id| u32::from(id != 0)).collect();
        EncodedInput::new(ids, mask)
    }
}

/// Toy model whose positive logit grows with the number of unmasked tokens.
struct LengthEngine;

impl InferenceEngine for LengthEngine {
    fn run(&self, input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        let real_tokens = input.attention_mask().iter().filter(|&&m| m == 1).count() as f32;
        Ok(vec![-2.0, real_tokens - 5.0])
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            inputs: vec![
                TensorInfo { name: "input_ids".into(), description: "Int64 [-1, -1]".into() },
                TensorInfo { name: "attention_mask".into(), description: "Int64 [-1, -1]".into() },
            ],
            outputs: vec![TensorInfo { name: "logits".into(), description: "Float32 [-1, 2]".into() }],
        }
    }
}

struct ConstEngine(Vec<f32>);

impl InferenceEngine for ConstEngine {
    fn run(&self, _input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        Ok(self.0.clone())
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata::default()
    }
}

struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn run(&self, _input: &EncodedInput) -> Result<Vec<f32>, ClassifierError> {
        Err(ClassifierError::ModelError("session lost".into()))
    }

    fn metadata(&self) -> ModelMetadata {
        ModelMetadata::default()
    }
}

fn setup_test_classifier() -> SentimentClassifier {
    SentimentClassifier::builder()
        .with_encoder(WordEncoder)
        .with_engine(LengthEngine)
        .build()
        .expect("Failed to create classifier")
}

#[test]
fn test_end_to_end_reference_flow() {
    let classifier = setup_test_classifier();
    // 4 words + CLS + SEP = 6 real tokens -> logits [-2, 1]
    let result = classifier.predict("I don't like this.").unwrap();
    assert_eq!(result.label, "POSITIVE");
    assert!((result.confidence - 0.952574).abs() < 1e-5);

    let scores: Vec<_> = result.scores(classifier.labels()).collect();
    assert_eq!(scores[0].0, "NEGATIVE");
    assert_eq!(scores[1].0, "POSITIVE");
}

#[test]
fn test_padding_is_masked_out() {
    let classifier = setup_test_classifier();
    // 1 word + CLS + SEP = 3 real tokens -> logits [-2, -2], a tie
    let result = classifier.predict("meh").unwrap();
    assert_eq!(result.label, "NEGATIVE");
    assert!((result.confidence - 0.5).abs() < 1e-12);
}

#[test]
fn test_custom_labels() {
    let classifier = SentimentClassifier::builder()
        .with_encoder(WordEncoder)
        .with_engine(ConstEngine(vec![0.0, 3.0, 1.0]))
        .with_labels(LabelSet::new(["negative", "neutral", "positive"]).unwrap())
        .build()
        .unwrap();
    let result = classifier.predict("anything").unwrap();
    assert_eq!(result.label, "neutral");
    assert_eq!(result.distribution.len(), 3);
}

#[test]
fn test_label_count_must_match_model() {
    let classifier = SentimentClassifier::builder()
        .with_encoder(WordEncoder)
        .with_engine(ConstEngine(vec![0.0, 3.0, 1.0]))
        .build()
        .unwrap();
    assert!(matches!(
        classifier.predict("anything"),
        Err(ClassifierError::Scoring(ScoreError::DimensionMismatch { logits: 3, labels: 2 }))
    ));
}

#[test]
fn test_non_finite_model_output() {
    let classifier = SentimentClassifier::builder()
        .with_encoder(WordEncoder)
        .with_engine(ConstEngine(vec![f32::NAN, 1.0]))
        .build()
        .unwrap();
    assert!(matches!(
        classifier.predict("anything"),
        Err(ClassifierError::Scoring(ScoreError::InvalidInput(_)))
    ));
}

#[test]
fn test_engine_errors_propagate() {
    let classifier = SentimentClassifier::builder()
        .with_encoder(WordEncoder)
        .with_engine(FailingEngine)
        .build()
        .unwrap();
    let err = classifier.predict("anything").unwrap_err();
    assert_eq!(err.to_string(), "Model error: session lost");
}

#[test]
fn test_predict_batch() {
    let classifier = setup_test_classifier();
    let results = classifier
        .predict_batch(&["meh", "this is really quite good"])
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label, "NEGATIVE");
    assert_eq!(results[1].label, "POSITIVE");

    assert!(classifier.predict_batch(&["fine", ""]).is_err());
}

#[test]
fn test_metadata_listing() {
    let classifier = setup_test_classifier();
    let listing = classifier.metadata().to_string();
    assert!(listing.contains("Model Inputs:"));
    assert!(listing.contains("  attention_mask : Int64 [-1, -1]"));
    assert!(listing.contains("Model Outputs:"));
    assert_eq!(classifier.info().metadata.outputs[0].name, "logits");
}

#[test]
fn test_thread_safety() {
    let classifier = Arc::new(setup_test_classifier());
    let mut handles = vec![];

    for i in 0..8 {
        let classifier = Arc::clone(&classifier);
        let handle = thread::spawn(move || {
            let text = "word ".repeat(i + 1);
            let result = classifier.predict(&text).unwrap();
            (i, result)
        });
        handles.push(handle);
    }

    for handle in handles {
        let (i, result) = handle.join().unwrap();
        let expected = classifier.predict(&"word ".repeat(i + 1)).unwrap();
        assert_eq!(result, expected);
    }
}
