use std::path::Path;

use tokenizers::Tokenizer;
use log::info;

use super::error::ClassifierError;

/// Default maximum sequence length for BERT-family models.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 512;

/// Token ids and attention mask for a single text, ready for the model.
///
/// Both sequences have the same non-zero length; the mask marks real tokens
/// with `1` and padding with `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    token_ids: Vec<u32>,
    attention_mask: Vec<u32>,
}

impl EncodedInput {
    pub fn new(token_ids: Vec<u32>, attention_mask: Vec<u32>) -> Result<Self, ClassifierError> {
        if token_ids.is_empty() {
            return Err(ClassifierError::ValidationError("Encoded input cannot be empty".into()));
        }
        if token_ids.len() != attention_mask.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Token ids ({}) and attention mask ({}) differ in length",
                token_ids.len(),
                attention_mask.len()
            )));
        }
        if let Some(pos) = attention_mask.iter().position(|&m| m > 1) {
            return Err(ClassifierError::ValidationError(format!(
                "Attention mask value {} at position {} is not 0 or 1",
                attention_mask[pos], pos
            )));
        }
        Ok(Self { token_ids, attention_mask })
    }

    /// Builds an input with every position marked as a real token.
    pub fn unpadded(token_ids: Vec<u32>) -> Result<Self, ClassifierError> {
        let attention_mask = vec![1; token_ids.len()];
        Self::new(token_ids, attention_mask)
    }

    pub fn token_ids(&self) -> &[u32] {
        &self.token_ids
    }

    pub fn attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn len(&self) -> usize {
        self.token_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_ids.is_empty()
    }
}

/// Converts text into model input.
pub trait TextEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<EncodedInput, ClassifierError>;

    /// Counts the tokens `text` encodes to, special tokens included.
    fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.encode(text).map(|input| input.len())
    }
}

/// [`TextEncoder`] backed by a Hugging Face `tokenizer.json`.
#[derive(Debug)]
pub struct HfTextEncoder {
    tokenizer: Tokenizer,
    max_sequence_length: usize,
    pad_id: Option<u32>,
}

impl HfTextEncoder {
    /// Loads a tokenizer from a `tokenizer.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P, max_sequence_length: Option<usize>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ClassifierError::BuildError(format!("Tokenizer file not found: {}", path.display())));
        }
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| {
                log::error!("Failed to load tokenizer: {}", e);
                ClassifierError::BuildError(format!("Failed to load tokenizer: {}", e))
            })?;
        info!("Tokenizer loaded successfully from {}", path.display());
        Ok(Self::from_tokenizer(tokenizer, max_sequence_length))
    }

    pub fn from_tokenizer(tokenizer: Tokenizer, max_sequence_length: Option<usize>) -> Self {
        let pad_id = tokenizer.get_padding().map(|p| p.pad_id);
        Self {
            tokenizer,
            max_sequence_length: max_sequence_length.unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH),
            pad_id,
        }
    }

    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }
}

impl TextEncoder for HfTextEncoder {
    /// Tokenizes `text` with special tokens.
    ///
    /// The mask starts from the tokenizer's attention mask; positions holding
    /// the configured padding id are additionally masked out.
    ///
    /// # Errors
    /// - `TokenizerError` if the text cannot be encoded
    /// - `ValidationError` if the token count exceeds the maximum sequence length
    fn encode(&self, text: &str) -> Result<EncodedInput, ClassifierError> {
        let encoding = self.tokenizer.encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
        let token_ids = encoding.get_ids();

        let token_len = token_ids.len();
        if token_len > self.max_sequence_length {
            return Err(ClassifierError::ValidationError(format!(
                "Input text too long: {} tokens (max: {}). Consider splitting the text into smaller chunks.",
                token_len, self.max_sequence_length
            )));
        }

        let attention_mask = token_ids.iter()
            .zip(encoding.get_attention_mask())
            .map(|(&id, &mask)| match self.pad_id {
                Some(pad) if id == pad => 0,
                _ => mask.min(1),
            })
            .collect();

        EncodedInput::new(token_ids.to_vec(), attention_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_input_validation() {
        assert!(EncodedInput::new(vec![101, 2023, 102], vec![1, 1, 1]).is_ok());
        assert!(matches!(
            EncodedInput::new(vec![], vec![]),
            Err(ClassifierError::ValidationError(_))
        ));
        assert!(matches!(
            EncodedInput::new(vec![101, 102], vec![1]),
            Err(ClassifierError::ValidationError(_))
        ));
        assert!(matches!(
            EncodedInput::new(vec![101, 102], vec![1, 2]),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_unpadded_marks_every_token() {
        let input = EncodedInput::unpadded(vec![7, 8, 9]).unwrap();
        assert_eq!(input.attention_mask(), &[1, 1, 1]);
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_missing_tokenizer_file() {
        let result = HfTextEncoder::from_file("/nonexistent/tokenizer.json", None);
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }
}
