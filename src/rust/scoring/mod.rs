//! Turns raw classifier logits into a probability distribution and a label.
//!
//! Everything in this module is pure: no global state, no I/O, no locking.

mod error;
mod interpreter;
mod labels;

pub use error::ScoreError;
pub use interpreter::{
    classify, softmax, ClassificationResult, ProbabilityDistribution, ScoreInterpreter,
    TIE_TOLERANCE,
};
pub use labels::{LabelSet, MIN_CLASSES};
