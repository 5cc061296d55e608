//! End-to-end article analysis pipeline.
//!
//! One entry point wires the stages together: validate the URL, fetch and
//! extract the article, validate the body, then run summarization, sentiment
//! and keyword extraction. Only validation and extraction abort the run; the
//! model stages degrade in-band and always produce a record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::extractor::{self, ArticleRecord, ExtractError};
use crate::inference::ModelProvider;
use crate::keywords::{KeywordRecord, KeywordService};
use crate::sentiment::{SentimentRecord, SentimentService};
use crate::summarize::{SummaryRecord, SummarizerService, DEFAULT_CHUNK_SIZE};
use crate::validate::{self, NewsUrl, ValidationError};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

/// Per-request knobs; `Default` matches the interactive defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeSettings {
    pub max_summary_length: usize,
    pub min_summary_length: usize,
    pub keyword_count: usize,
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            max_summary_length: 150,
            min_summary_length: 50,
            keyword_count: 5,
        }
    }
}

/// Everything produced for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub article: ArticleRecord,
    pub summary: SummaryRecord,
    pub sentiment: SentimentRecord,
    pub keywords: Vec<KeywordRecord>,
    pub analyzed_at: DateTime<Utc>,
}

pub struct Analyzer {
    summarizer: SummarizerService,
    sentiment: SentimentService,
    keywords: KeywordService,
}

impl Analyzer {
    pub fn new(provider: &ModelProvider) -> Self {
        Self {
            summarizer: SummarizerService::new(provider.summarizer()),
            sentiment: SentimentService::new(provider.classifier()),
            keywords: KeywordService::new(provider.embedder()),
        }
    }

    /// Run the full pipeline against `url`.
    #[instrument(skip(self, settings), fields(url = %url))]
    pub async fn analyze(
        &self,
        url: &str,
        settings: &AnalyzeSettings,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let url = validate::sanitize_url(url);
        match validate::check_url(&url)? {
            NewsUrl::Supported { domain } => info!(domain, "recognized news outlet"),
            NewsUrl::Unrecognized => info!("unlisted host, attempting extraction anyway"),
        }

        let article = extractor::extract_article(&url).await?;
        validate::check_article_text(&article.content)?;
        info!(
            title = %article.title,
            source = %article.source,
            content_chars = article.content_length(),
            "article extracted"
        );

        let summary = self
            .summarizer
            .summarize_long(
                &article.content,
                DEFAULT_CHUNK_SIZE,
                Some(settings.max_summary_length),
                Some(settings.min_summary_length),
            )
            .await;
        info!(
            summary_chars = summary.summary_length,
            compression = summary.compression_ratio(),
            "summary generated"
        );

        let sentiment = self.sentiment.analyze(&article.content).await;
        info!(label = %sentiment.label, confidence = sentiment.confidence, "sentiment analyzed");

        let keywords = self
            .keywords
            .extract(&article.content, settings.keyword_count)
            .await;
        info!(count = keywords.len(), "keywords extracted");

        Ok(AnalysisResult {
            article,
            summary,
            sentiment,
            keywords,
            analyzed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_interactive_defaults() {
        let settings = AnalyzeSettings::default();
        assert_eq!(settings.max_summary_length, 150);
        assert_eq!(settings.min_summary_length, 50);
        assert_eq!(settings.keyword_count, 5);
    }

    #[tokio::test]
    async fn malformed_url_is_rejected_before_any_fetch() {
        let provider = ModelProvider::from_config(&crate::config::Config::default());
        let analyzer = Analyzer::new(&provider);

        let err = analyzer
            .analyze("ht!tp://not a url", &AnalyzeSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Validation(ValidationError::InvalidUrl)));
    }
}
