//! Configuration handling for the application.
//!
//! Everything is read from environment variables with development defaults,
//! so the library works out of the box against a local inference server and
//! can be pointed at a hosted one in deployment. `Config::from_env` performs
//! that loading; validation hooks can grow into `ConfigError` later.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable names. Keeping them public lets tests and callers
/// refer to them directly.
pub const ENV_INFERENCE_URL: &str = "INFERENCE_URL";
pub const ENV_INFERENCE_TOKEN: &str = "INFERENCE_TOKEN";
pub const ENV_SUMMARY_MODEL: &str = "SUMMARY_MODEL";
pub const ENV_SENTIMENT_MODEL: &str = "SENTIMENT_MODEL";
pub const ENV_EMBEDDING_MODEL: &str = "EMBEDDING_MODEL";

/// Default development values used when environment variables are absent.
const DEFAULT_INFERENCE_URL: &str = "http://127.0.0.1:8089";
const DEFAULT_SUMMARY_MODEL: &str = "gogamza/kobart-summarization";
const DEFAULT_SENTIMENT_MODEL: &str = "snunlp/KR-FinBert-SC";
const DEFAULT_EMBEDDING_MODEL: &str = "jhgan/ko-sroberta-multitask";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    inference_url: String,
    inference_token: Option<String>,
    summary_model: String,
    sentiment_model: String,
    embedding_model: String,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        inference_url: impl Into<String>,
        inference_token: Option<String>,
        summary_model: impl Into<String>,
        sentiment_model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Self {
        Self {
            inference_url: inference_url.into(),
            inference_token,
            summary_model: summary_model.into(),
            sentiment_model: sentiment_model.into(),
            embedding_model: embedding_model.into(),
        }
    }

    /// Load from environment variables, falling back to development defaults.
    ///
    /// Never fails today; endpoint URL validation can make this return a
    /// `ConfigError` in the future.
    pub fn from_env() -> Result<Self, ConfigError> {
        let inference_url =
            env::var(ENV_INFERENCE_URL).unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string());
        let inference_token = env::var(ENV_INFERENCE_TOKEN).ok();
        let summary_model =
            env::var(ENV_SUMMARY_MODEL).unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.to_string());
        let sentiment_model =
            env::var(ENV_SENTIMENT_MODEL).unwrap_or_else(|_| DEFAULT_SENTIMENT_MODEL.to_string());
        let embedding_model =
            env::var(ENV_EMBEDDING_MODEL).unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());
        Ok(Self {
            inference_url,
            inference_token,
            summary_model,
            sentiment_model,
            embedding_model,
        })
    }

    /// Base URL of the model inference endpoint.
    pub fn inference_url(&self) -> &str {
        &self.inference_url
    }
    /// Optional bearer token for the inference endpoint.
    pub fn inference_token(&self) -> Option<&str> {
        self.inference_token.as_deref()
    }
    /// Identifier of the pretrained summarization model.
    pub fn summary_model(&self) -> &str {
        &self.summary_model
    }
    /// Identifier of the pretrained sentiment classification model.
    pub fn sentiment_model(&self) -> &str {
        &self.sentiment_model
    }
    /// Identifier of the pretrained sentence-embedding model.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        // not `Default` impl yet to keep explicit semantics
        Self::new(
            DEFAULT_INFERENCE_URL,
            None,
            DEFAULT_SUMMARY_MODEL,
            DEFAULT_SENTIMENT_MODEL,
            DEFAULT_EMBEDDING_MODEL,
        )
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reserved for future validation failures.
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_INFERENCE_URL,
            ENV_INFERENCE_TOKEN,
            ENV_SUMMARY_MODEL,
            ENV_SENTIMENT_MODEL,
            ENV_EMBEDDING_MODEL,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.inference_url(), super::DEFAULT_INFERENCE_URL);
        assert_eq!(cfg.inference_token(), None);
        assert_eq!(cfg.summary_model(), super::DEFAULT_SUMMARY_MODEL);
        assert_eq!(cfg.sentiment_model(), super::DEFAULT_SENTIMENT_MODEL);
        assert_eq!(cfg.embedding_model(), super::DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_INFERENCE_URL, "https://inference.example.com");
            env::set_var(ENV_INFERENCE_TOKEN, "hf_token");
            env::set_var(ENV_SUMMARY_MODEL, "other/summarizer");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.inference_url(), "https://inference.example.com");
        assert_eq!(cfg.inference_token(), Some("hf_token"));
        assert_eq!(cfg.summary_model(), "other/summarizer");
        assert_eq!(cfg.sentiment_model(), super::DEFAULT_SENTIMENT_MODEL);
        clear_env();
    }
}
