use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::ScoreError;

/// Minimum number of classes a classifier can meaningfully distinguish.
pub const MIN_CLASSES: usize = 2;

/// An ordered, validated set of class labels.
///
/// The position of a label is its class index: label `i` names logit `i`
/// of every vector the model produces. A `LabelSet` always holds at least
/// two labels, none of them empty, none repeated.
///
/// # Example
/// ```
/// use amygdala::LabelSet;
///
/// let labels = LabelSet::new(["NEGATIVE", "NEUTRAL", "POSITIVE"]).unwrap();
/// assert_eq!(labels.len(), 3);
/// assert_eq!(labels.index_of("NEUTRAL"), Some(1));
///
/// assert!(LabelSet::new(["ONLY"]).is_err());
/// assert!(LabelSet::new(["A", "A"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Validates and wraps the given labels, keeping their order.
    pub fn new<I, S>(labels: I) -> Result<Self, ScoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.len() < MIN_CLASSES {
            return Err(ScoreError::InvalidLabelSet(format!(
                "at least {} labels are required, got {}",
                MIN_CLASSES,
                labels.len()
            )));
        }
        if let Some(pos) = labels.iter().position(|l| l.is_empty()) {
            return Err(ScoreError::InvalidLabelSet(format!(
                "label at index {} is empty",
                pos
            )));
        }

        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ScoreError::InvalidLabelSet(format!(
                    "duplicate label '{}'",
                    label
                )));
            }
        }

        Ok(Self { labels })
    }

    /// The two-class sentiment labels used by SST-2 style models.
    pub fn binary_sentiment() -> Self {
        Self {
            labels: vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.labels.join(", "))
    }
}
