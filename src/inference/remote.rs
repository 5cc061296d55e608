//! JSON-over-HTTP implementations of the model traits.
//!
//! Speaks the hosted-inference convention: `POST {base}/models/{model_id}`
//! with an `inputs` payload, optional bearer token. Responses differ per
//! task and are parsed leniently, since serving stacks disagree on nesting.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::{GenerationParams, InferenceError, RawClassification, TextClassifier, TextEmbedder, TextGenerator};

#[derive(Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
    options: RequestOptions,
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
        }
    }
}

/// Shared transport state for one remote model.
#[derive(Clone)]
pub(crate) struct Endpoint {
    client: Arc<Client>,
    base_url: String,
    token: Option<String>,
    model_id: String,
}

impl Endpoint {
    pub(crate) fn new(
        client: Arc<Client>,
        base_url: impl Into<String>,
        token: Option<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
            model_id: model_id.into(),
        }
    }

    async fn post<B: Serialize>(&self, body: &B) -> Result<Value, InferenceError> {
        let mut request = self
            .client
            .post(format!(
                "{}/models/{}",
                self.base_url.trim_end_matches('/'),
                self.model_id
            ))
            .json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                model: self.model_id.clone(),
                status,
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Remote sequence-to-sequence generation model.
#[derive(Debug, Clone)]
pub struct RemoteGenerator {
    endpoint: Endpoint,
}

impl RemoteGenerator {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl TextGenerator for RemoteGenerator {
    async fn generate(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, InferenceError> {
        let body = GenerationRequest {
            inputs: text,
            parameters: params,
            options: RequestOptions::default(),
        };
        let value = self.endpoint.post(&body).await?;

        // [{"summary_text": "..."}] or [{"generated_text": "..."}]
        let entry = value
            .as_array()
            .and_then(|a| a.first())
            .ok_or_else(|| InferenceError::Malformed("expected non-empty array".into()))?;
        entry
            .get("summary_text")
            .or_else(|| entry.get("generated_text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| InferenceError::Malformed("missing generated text field".into()))
    }
}

/// Remote text-classification model. Only the top label is surfaced.
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    endpoint: Endpoint,
}

impl RemoteClassifier {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl TextClassifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<RawClassification, InferenceError> {
        let body = ClassificationRequest {
            inputs: text,
            options: RequestOptions::default(),
        };
        let value = self.endpoint.post(&body).await?;

        // [{"label": ..., "score": ...}] — some stacks wrap it once more
        let mut entry = value
            .as_array()
            .and_then(|a| a.first())
            .ok_or_else(|| InferenceError::Malformed("expected non-empty array".into()))?;
        if let Some(inner) = entry.as_array() {
            entry = inner
                .first()
                .ok_or_else(|| InferenceError::Malformed("empty label list".into()))?;
        }

        let label = entry
            .get("label")
            .and_then(Value::as_str)
            .ok_or_else(|| InferenceError::Malformed("missing label".into()))?;
        let score = entry
            .get("score")
            .and_then(Value::as_f64)
            .ok_or_else(|| InferenceError::Malformed("missing score".into()))?;

        Ok(RawClassification {
            label: label.to_string(),
            score,
        })
    }
}

/// Remote sentence-embedding model.
#[derive(Debug, Clone)]
pub struct RemoteEmbedder {
    endpoint: Endpoint,
}

impl RemoteEmbedder {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl TextEmbedder for RemoteEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = EmbeddingRequest {
            inputs: texts,
            options: RequestOptions::default(),
        };
        let value = self.endpoint.post(&body).await?;

        let vectors: Vec<Vec<f32>> = serde_json::from_value(value)
            .map_err(|e| InferenceError::Malformed(format!("bad embedding payload: {e}")))?;
        if vectors.len() != texts.len() {
            return Err(InferenceError::Malformed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}
