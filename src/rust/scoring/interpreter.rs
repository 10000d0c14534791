use std::ops::Index;

use log::debug;
use serde::Serialize;

use super::error::ScoreError;
use super::labels::{LabelSet, MIN_CLASSES};

/// Two probabilities closer than this are treated as tied.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// A probability distribution over classes, index-aligned with the logits
/// it was derived from. Every element lies in `[0, 1]` and the elements sum
/// to one within floating-point tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityDistribution {
    probabilities: Vec<f64>,
}

impl ProbabilityDistribution {
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.probabilities.iter().copied()
    }

    /// Index of the most probable class. Ties within [`TIE_TOLERANCE`]
    /// resolve to the lowest index.
    pub fn argmax(&self) -> usize {
        let max = self
            .probabilities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        self.probabilities
            .iter()
            .position(|&p| max - p <= TIE_TOLERANCE)
            .unwrap_or(0)
    }
}

impl Index<usize> for ProbabilityDistribution {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.probabilities[index]
    }
}

/// The outcome of scoring one logit vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// The predicted class label
    pub label: String,
    /// Class index of the predicted label
    pub index: usize,
    /// Probability assigned to the predicted label
    pub confidence: f64,
    /// Full distribution, in class order
    pub distribution: ProbabilityDistribution,
}

impl ClassificationResult {
    /// Pairs every label with its probability, in class order.
    pub fn scores<'a>(&'a self, labels: &'a LabelSet) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        labels.iter().zip(self.distribution.iter())
    }
}

/// Numerically stable softmax.
///
/// The maximum logit is subtracted before exponentiating so large positive
/// logits cannot overflow and large negative ones cannot all underflow to
/// zero. Accepts `f32` (what ONNX classifiers emit) or `f64` and always
/// computes in `f64`.
///
/// # Errors
/// - `InvalidInput` if fewer than two logits are given
/// - `InvalidInput` if any logit is NaN or infinite
///
/// # Example
/// ```
/// use amygdala::softmax;
///
/// let probs = softmax(&[1000.0_f32, 1.0]).unwrap();
/// assert!(probs[0] > 0.999_999);
/// assert!(probs.iter().all(f64::is_finite));
/// ```
pub fn softmax<T>(logits: &[T]) -> Result<ProbabilityDistribution, ScoreError>
where
    T: Copy + Into<f64>,
{
    let values = validate_logits(logits)?;

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values.iter().map(|&v| (v - max).exp()).collect();
    // The max element contributes exp(0) = 1, so the sum is at least 1.
    let sum: f64 = exps.iter().sum();

    Ok(ProbabilityDistribution {
        probabilities: exps.into_iter().map(|e| e / sum).collect(),
    })
}

/// Scores `logits` against an ad-hoc list of labels.
///
/// Checks run in order: label set validity, then dimensions, then the
/// logits themselves.
///
/// # Example
/// ```
/// use amygdala::classify;
///
/// let result = classify(&[-2.0, 2.0], &["NEGATIVE", "POSITIVE"]).unwrap();
/// assert_eq!(result.label, "POSITIVE");
/// assert!((result.confidence - 0.982).abs() < 1e-3);
/// ```
pub fn classify<T, S>(logits: &[T], labels: &[S]) -> Result<ClassificationResult, ScoreError>
where
    T: Copy + Into<f64>,
    S: AsRef<str>,
{
    let labels = LabelSet::new(labels.iter().map(|l| l.as_ref()))?;
    ScoreInterpreter::new(labels).classify(logits)
}

/// Maps raw model logits to a label using a fixed label set.
///
/// Stateless beyond its configuration: `classify` takes `&self`, allocates
/// only call-local data and may be called from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInterpreter {
    labels: LabelSet,
}

impl ScoreInterpreter {
    pub fn new(labels: LabelSet) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Converts `logits` to a distribution and picks the most probable
    /// label, resolving ties to the lowest class index.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `logits.len()` differs from the label count
    /// - `InvalidInput` if any logit is NaN or infinite
    pub fn classify<T>(&self, logits: &[T]) -> Result<ClassificationResult, ScoreError>
    where
        T: Copy + Into<f64>,
    {
        if logits.len() != self.labels.len() {
            debug!(
                "Rejecting {} logits for label set {}",
                logits.len(),
                self.labels
            );
            return Err(ScoreError::DimensionMismatch {
                logits: logits.len(),
                labels: self.labels.len(),
            });
        }

        let distribution = softmax(logits)?;
        let index = distribution.argmax();
        let confidence = distribution[index];
        let label = self
            .labels
            .get(index)
            .map(str::to_string)
            .ok_or(ScoreError::DimensionMismatch {
                logits: logits.len(),
                labels: self.labels.len(),
            })?;

        Ok(ClassificationResult {
            label,
            index,
            confidence,
            distribution,
        })
    }
}

impl Default for ScoreInterpreter {
    fn default() -> Self {
        Self::new(LabelSet::binary_sentiment())
    }
}

fn validate_logits<T>(logits: &[T]) -> Result<Vec<f64>, ScoreError>
where
    T: Copy + Into<f64>,
{
    if logits.len() < MIN_CLASSES {
        debug!("Rejecting logit vector of length {}", logits.len());
        return Err(ScoreError::InvalidInput(format!(
            "at least {} logits are required, got {}",
            MIN_CLASSES,
            logits.len()
        )));
    }

    let values: Vec<f64> = logits.iter().map(|&v| v.into()).collect();
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        debug!("Rejecting non-finite logit {} at index {}", values[pos], pos);
        return Err(ScoreError::InvalidInput(format!(
            "logit at index {} is not finite ({})",
            pos, values[pos]
        )));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{} and {} differ by more than {}", a, b, tol);
    }

    #[test]
    fn test_softmax_reference_values() {
        let probs = softmax(&[-2.0_f32, 2.0]).unwrap();
        assert_close(probs[0], 0.017986, 1e-6);
        assert_close(probs[1], 0.982014, 1e-6);
    }

    #[test]
    fn test_softmax_rejects_short_and_non_finite() {
        assert!(matches!(softmax::<f64>(&[]), Err(ScoreError::InvalidInput(_))));
        assert!(matches!(softmax(&[3.0]), Err(ScoreError::InvalidInput(_))));
        assert!(matches!(softmax(&[0.0, f64::NAN]), Err(ScoreError::InvalidInput(_))));
        assert!(matches!(softmax(&[f32::INFINITY, 0.0]), Err(ScoreError::InvalidInput(_))));
        assert!(matches!(
            softmax(&[0.0, f64::NEG_INFINITY]),
            Err(ScoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_softmax_extreme_logits_stay_finite() {
        let probs = softmax(&[f32::MAX, f32::MIN]).unwrap();
        assert_eq!(probs[0], 1.0);
        assert_eq!(probs[1], 0.0);

        let probs = softmax(&[-1.0e4, -1.0e4 - 1.0]).unwrap();
        assert!(probs.iter().all(|p| p.is_finite() && p > 0.0));
        assert_close(probs.iter().sum(), 1.0, 1e-12);
    }

    #[test]
    fn test_argmax_lowest_index_on_tie() {
        let probs = softmax(&[1.0, 3.0, 3.0, 2.0]).unwrap();
        assert_eq!(probs.argmax(), 1);

        let probs = softmax(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(probs.argmax(), 0);
    }

    #[test]
    fn test_interpreter_dimension_check_precedes_value_check() {
        let interpreter = ScoreInterpreter::default();
        assert_eq!(
            interpreter.classify(&[f64::NAN, 0.0, 1.0]),
            Err(ScoreError::DimensionMismatch { logits: 3, labels: 2 })
        );
    }

    #[test]
    fn test_scores_pairs_labels_in_order() {
        let interpreter = ScoreInterpreter::default();
        let result = interpreter.classify(&[0.0_f32, 0.0]).unwrap();
        let scores: Vec<_> = result.scores(interpreter.labels()).collect();
        assert_eq!(scores, vec![("NEGATIVE", 0.5), ("POSITIVE", 0.5)]);
    }
}
