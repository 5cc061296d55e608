//! Primary extraction strategy: general-purpose readability extraction.

use readability::extractor;
use url::Url;

use crate::extractor::model::StrategyResult;
use crate::text;

/// Let the readability algorithm guess title and body. Returns `None` on
/// any parse failure or an empty result, which sends the caller to the
/// selector fallback.
pub fn extract(html: &str, url: &Url) -> Option<StrategyResult> {
    let article = extractor::extract(&mut html.as_bytes(), url).ok()?;

    let text = text::normalize_whitespace(&article.text);
    if text.is_empty() {
        return None;
    }

    Some(StrategyResult {
        title: article.title.trim().to_string(),
        text,
    })
}
