use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Title used when no title source exists on the page.
pub const DEFAULT_TITLE: &str = "제목 없음";

/// One extracted article. Created once per request, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: Url,
    pub title: String,
    pub content: String,
    /// Publication time when the page declares one; absence is not an error.
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    /// Outlet name from the known-domain table, or the raw domain.
    pub source: String,
    /// Detected language code, e.g. "ko".
    pub language: Option<String>,
}

impl ArticleRecord {
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }
}

/// Title and body produced by one extraction strategy. Metadata (date,
/// image, source) is resolved separately and shared by both strategies.
#[derive(Debug)]
pub struct StrategyResult {
    pub title: String,
    pub text: String,
}
