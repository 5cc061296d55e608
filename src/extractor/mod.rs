//! Dual-strategy article extraction.
//!
//! Strategy A lets a readability pass guess title and body; any failure or
//! empty result falls back to strategy B, the selector chains in
//! [`selectors`]. Only when both strategies recover no body text does
//! extraction fail — everything downstream needs that text.

pub mod model;
pub mod reader;
pub mod selectors;
pub mod sources;

#[cfg(test)]
mod tests;

pub use model::{ArticleRecord, DEFAULT_TITLE};

use scraper::Html;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::fetcher::{self, FetchError, PageResponse};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("기사 본문을 추출할 수 없습니다.")]
    NoContent,
}

/// Fetch a URL and extract its article. The only fatal stage of the
/// analysis pipeline: without body text no downstream stage has input.
pub async fn extract_article(url: &str) -> Result<ArticleRecord, ExtractError> {
    let response = fetcher::fetch(url).await?;
    extract(&response)
}

/// Extract an article from an already fetched page.
#[instrument(skip_all, fields(url = %response.url_final))]
pub fn extract(response: &PageResponse) -> Result<ArticleRecord, ExtractError> {
    let document = Html::parse_document(&response.body_utf8);
    let url = &response.url_final;

    let (title, content) = match reader::extract(&response.body_utf8, url) {
        Some(result) => {
            debug!("readability strategy succeeded");
            let title = if result.title.is_empty() {
                selectors::extract_title(&document)
            } else {
                Some(result.title)
            };
            (title, result.text)
        }
        None => {
            warn!("readability strategy failed, using selector fallback");
            let body = selectors::extract_body(&document, url).ok_or(ExtractError::NoContent)?;
            (selectors::extract_title(&document), body)
        }
    };

    if content.trim().is_empty() {
        return Err(ExtractError::NoContent);
    }

    Ok(ArticleRecord {
        url: url.clone(),
        title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        published_at: selectors::extract_date(&document),
        image_url: selectors::extract_image(&document),
        source: sources::source_name(url),
        language: detect_language(&content),
        content,
    })
}

/// Language tag for the extracted body, e.g. "ko". Detection is skipped for
/// very short or ambiguous text.
fn detect_language(text: &str) -> Option<String> {
    const MIN_CONFIDENCE: f64 = 0.25;
    const MIN_TEXT_LENGTH: usize = 50;

    if text.trim().chars().count() < MIN_TEXT_LENGTH {
        return None;
    }

    let info = whatlang::detect(text)?;
    if info.confidence() < MIN_CONFIDENCE {
        return None;
    }
    Some(lang_to_code(info.lang()))
}

fn lang_to_code(lang: whatlang::Lang) -> String {
    use whatlang::Lang;
    match lang {
        Lang::Kor => "ko".to_string(),
        Lang::Eng => "en".to_string(),
        Lang::Jpn => "ja".to_string(),
        Lang::Cmn => "zh".to_string(),
        // ISO 639-3 for the long tail
        other => other.code().to_string(),
    }
}
