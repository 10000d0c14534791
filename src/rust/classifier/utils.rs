use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::ClassifierError;
use crate::scoring::LabelSet;

#[derive(Debug, Deserialize)]
struct ModelConfig {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// Reads the `id2label` map of a Hugging Face `config.json` into a label set.
///
/// Class ids must be the contiguous range `0..n`; anything else means the
/// labels cannot be aligned with the logits.
pub(crate) fn labels_from_config(path: &Path) -> Result<LabelSet, ClassifierError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ClassifierError::BuildError(format!("Failed to read {}: {}", path.display(), e)))?;
    labels_from_config_str(&raw)
}

pub(crate) fn labels_from_config_str(raw: &str) -> Result<LabelSet, ClassifierError> {
    let config: ModelConfig = serde_json::from_str(raw)
        .map_err(|e| ClassifierError::BuildError(format!("Invalid model config: {}", e)))?;

    let mut indexed = config.id2label.into_iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label))
                .map_err(|_| ClassifierError::BuildError(format!("Non-numeric class id '{}' in id2label", id)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    indexed.sort_by_key(|(id, _)| *id);

    if let Some(pos) = indexed.iter().enumerate().position(|(i, (id, _))| i != *id) {
        return Err(ClassifierError::BuildError(format!("id2label is missing class id {}", pos)));
    }

    Ok(LabelSet::new(indexed.into_iter().map(|(_, label)| label))?)
}
