//! Model-handle layer.
//!
//! The three pretrained models (summarization, sentiment classification,
//! sentence embedding) are external services addressed by fixed identifier
//! strings. Services depend on the narrow traits here, so tests can swap in
//! mocks and the remote transport stays in one place.

pub mod provider;
pub mod remote;

pub use provider::{ModelInfo, ModelProvider};
pub use remote::{RemoteClassifier, RemoteEmbedder, RemoteGenerator};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model '{model}' returned status {status}")]
    Status {
        model: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Decoding parameters for the sequence-to-sequence summarizer.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: usize,
    pub min_new_tokens: usize,
    pub num_beams: usize,
    pub length_penalty: f64,
    pub no_repeat_ngram_size: usize,
    pub early_stopping: bool,
    /// Inputs are truncated to this many tokens by the model tokenizer.
    pub truncation_length: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            min_new_tokens: 50,
            num_beams: 4,
            length_penalty: 2.0,
            no_repeat_ngram_size: 3,
            early_stopping: true,
            truncation_length: 1024,
        }
    }
}

/// Top label and its confidence as reported by the classification model.
/// The model exposes only its top label; full per-label distributions are
/// not available from this interface.
#[derive(Debug, Clone, PartialEq)]
pub struct RawClassification {
    pub label: String,
    pub score: f64,
}

/// Text-to-text generation handle (summarization).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError>;
}

/// Text classification handle (sentiment).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<RawClassification, InferenceError>;
}

/// Sentence-embedding handle (keyword ranking).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, InferenceError>;
}
