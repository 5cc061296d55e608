//! Construction and sharing of the three model handles.
//!
//! The provider is built once at process start and passed to each service,
//! replacing hidden global state while keeping load-at-most-once semantics:
//! the underlying HTTP client is a process-wide lazy singleton, so a first
//! use from concurrent requests cannot build it twice.

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::remote::{Endpoint, RemoteClassifier, RemoteEmbedder, RemoteGenerator};
use super::{TextClassifier, TextEmbedder, TextGenerator};
use crate::config::Config;

/// Generation can be slow on cold models; allow a generous budget.
const INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

static INFERENCE_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(
        ClientBuilder::new()
            .timeout(INFERENCE_TIMEOUT)
            .build()
            .expect("Failed to build inference HTTP client"),
    )
});

/// Identifiers of the models behind a provider.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub summary_model: String,
    pub sentiment_model: String,
    pub embedding_model: String,
}

/// Holds the three model handles used by the analysis services.
#[derive(Clone)]
pub struct ModelProvider {
    summarizer: Arc<dyn TextGenerator>,
    classifier: Arc<dyn TextClassifier>,
    embedder: Arc<dyn TextEmbedder>,
    info: ModelInfo,
}

impl ModelProvider {
    /// Build remote handles for the configured endpoint and model ids.
    pub fn from_config(config: &Config) -> Self {
        let info = ModelInfo {
            summary_model: config.summary_model().to_string(),
            sentiment_model: config.sentiment_model().to_string(),
            embedding_model: config.embedding_model().to_string(),
        };
        info!(
            endpoint = config.inference_url(),
            summary = %info.summary_model,
            sentiment = %info.sentiment_model,
            embedding = %info.embedding_model,
            "initializing model handles"
        );

        let client = Lazy::force(&INFERENCE_CLIENT).clone();
        let endpoint = |model_id: &str| {
            Endpoint::new(
                client.clone(),
                config.inference_url(),
                config.inference_token().map(str::to_string),
                model_id,
            )
        };

        Self {
            summarizer: Arc::new(RemoteGenerator::new(endpoint(config.summary_model()))),
            classifier: Arc::new(RemoteClassifier::new(endpoint(config.sentiment_model()))),
            embedder: Arc::new(RemoteEmbedder::new(endpoint(config.embedding_model()))),
            info,
        }
    }

    /// Assemble a provider from explicit handles (tests, local backends).
    pub fn new(
        summarizer: Arc<dyn TextGenerator>,
        classifier: Arc<dyn TextClassifier>,
        embedder: Arc<dyn TextEmbedder>,
        info: ModelInfo,
    ) -> Self {
        Self {
            summarizer,
            classifier,
            embedder,
            info,
        }
    }

    pub fn summarizer(&self) -> Arc<dyn TextGenerator> {
        self.summarizer.clone()
    }

    pub fn classifier(&self) -> Arc<dyn TextClassifier> {
        self.classifier.clone()
    }

    pub fn embedder(&self) -> Arc<dyn TextEmbedder> {
        self.embedder.clone()
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_exposes_configured_model_ids() {
        let config = Config::default();
        let provider = ModelProvider::from_config(&config);
        assert_eq!(
            provider.model_info().summary_model,
            "gogamza/kobart-summarization"
        );
        assert_eq!(provider.model_info().sentiment_model, "snunlp/KR-FinBert-SC");
        assert_eq!(
            provider.model_info().embedding_model,
            "jhgan/ko-sroberta-multitask"
        );
    }
}
