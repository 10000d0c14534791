use serde::{Deserialize, Serialize};

/// Download locations and integrity data for a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Directory name under the models cache
    pub name: String,
    pub model_url: String,
    pub tokenizer_url: String,
    /// Hugging Face `config.json`, source of the `id2label` mapping
    pub config_url: String,
    /// Pinned SHA-256 of `model.onnx`. When absent, the hash recorded at
    /// download time is used for later verification.
    pub model_hash: Option<String>,
    /// Pinned SHA-256 of `tokenizer.json`
    pub tokenizer_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCharacteristics {
    pub num_labels: usize,
    pub max_sequence_length: usize,
    pub model_size_mb: usize,
}

/// Models that can be fetched by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinModel {
    /// DistilBERT base uncased, fine-tuned on SST-2 (NEGATIVE / POSITIVE)
    DistilBertSst2,
}

impl BuiltinModel {
    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            BuiltinModel::DistilBertSst2 => {
                let base = "https://huggingface.co/distilbert/distilbert-base-uncased-finetuned-sst-2-english/resolve/main";
                ModelInfo {
                    name: "distilbert-sst2".to_string(),
                    model_url: format!("{}/onnx/model.onnx", base),
                    tokenizer_url: format!("{}/tokenizer.json", base),
                    config_url: format!("{}/config.json", base),
                    model_hash: None,
                    tokenizer_hash: None,
                }
            }
        }
    }

    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            BuiltinModel::DistilBertSst2 => ModelCharacteristics {
                num_labels: 2,
                max_sequence_length: 512,
                model_size_mb: 268,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_info() {
        let info = BuiltinModel::DistilBertSst2.get_model_info();
        assert_eq!(info.name, "distilbert-sst2");
        assert!(info.model_url.ends_with("/onnx/model.onnx"));
        assert!(info.tokenizer_url.ends_with("/tokenizer.json"));
        assert!(info.config_url.ends_with("/config.json"));
    }

    #[test]
    fn test_builtin_characteristics() {
        let characteristics = BuiltinModel::DistilBertSst2.characteristics();
        assert_eq!(characteristics.num_labels, 2);
        assert_eq!(characteristics.max_sequence_length, 512);
    }
}
