//! Fallback extraction strategy: prioritized CSS selector chains.
//!
//! No single readability pass handles every Korean news template, so this
//! module knows the body containers of the two big portals (Naver, Daum),
//! a generic set for everything else, and a paragraph harvest as the last
//! resort. Metadata (date, image) is read from meta/time tags and is shared
//! with the primary strategy.

use chrono::{DateTime, NaiveDateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::text;

/// Title selector chain, most specific first.
const TITLE_SELECTORS: [&str; 4] = [
    "h1.article_title",
    "h1.tit_view",
    "h1#articleTitle",
    "h1.news_ttl",
];

const NAVER_BODY: &str = "#dic_area, #articleBodyContents, .article_body";
const DAUM_BODY: &str = ".article_view, #dmcfContents";
const GENERIC_BODY: &str = "article, .article-body, .article_content, #article-body";

/// Paragraphs shorter than this are ignored by the harvest fallback.
const MIN_PARAGRAPH_CHARS: usize = 50;

/// Try the heading chain, then `og:title`, then the page `<title>`.
pub fn extract_title(document: &Html) -> Option<String> {
    for selector_str in TITLE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str)
            && let Some(element) = document.select(&selector).next()
        {
            let title = element.text().collect::<String>().trim().to_string();
            if !title.is_empty() {
                return Some(title);
            }
        }
    }

    if let Some(content) = meta_content(document, "meta[property='og:title']")
        && !content.is_empty()
    {
        return Some(content);
    }

    if let Ok(selector) = Selector::parse("title")
        && let Some(element) = document.select(&selector).next()
    {
        let title = element.text().collect::<String>().trim().to_string();
        if !title.is_empty() {
            return Some(title);
        }
    }

    None
}

/// Locate the article body with site-specific selectors, the generic set,
/// or the paragraph harvest. `None` when nothing yields text.
pub fn extract_body(document: &Html, url: &Url) -> Option<String> {
    let host = url.host_str().unwrap_or_default().to_lowercase();

    let selector_list = if host.contains("naver.com") {
        NAVER_BODY
    } else if host.contains("daum.net") {
        DAUM_BODY
    } else {
        GENERIC_BODY
    };

    if let Ok(selector) = Selector::parse(selector_list)
        && let Some(element) = document.select(&selector).next()
    {
        let body = text::normalize_whitespace(&element_text_without_noise(element));
        if !body.is_empty() {
            return Some(body);
        }
    }

    // Last resort: collect substantial paragraphs anywhere on the page
    let paragraph_selector = Selector::parse("p").ok()?;
    let body = document
        .select(&paragraph_selector)
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join(" ");
    let body = text::normalize_whitespace(&body);

    if body.is_empty() { None } else { Some(body) }
}

/// Publication time from meta/time selectors, first parsable match wins.
/// Absent or unparsable dates are `None`, never an error.
pub fn extract_date(document: &Html) -> Option<DateTime<Utc>> {
    if let Some(content) = meta_content(document, "meta[property='article:published_time']")
        && let Some(date) = parse_iso_datetime(&content)
    {
        return Some(date);
    }

    if let Ok(selector) = Selector::parse("time[datetime]") {
        for element in document.select(&selector) {
            if let Some(datetime) = element.value().attr("datetime")
                && let Some(date) = parse_iso_datetime(datetime)
            {
                return Some(date);
            }
        }
    }

    for selector_str in [".article_date", ".date"] {
        if let Ok(selector) = Selector::parse(selector_str)
            && let Some(element) = document.select(&selector).next()
        {
            let text = element.text().collect::<String>();
            if let Some(date) = parse_iso_datetime(text.trim()) {
                return Some(date);
            }
        }
    }

    None
}

/// Lead image: `og:image`, else the first in-article `<img src>`.
pub fn extract_image(document: &Html) -> Option<String> {
    if let Some(content) = meta_content(document, "meta[property='og:image']")
        && !content.is_empty()
    {
        return Some(content);
    }

    if let Ok(selector) = Selector::parse("article img, .article_body img")
        && let Some(element) = document.select(&selector).next()
        && let Some(src) = element.value().attr("src")
    {
        return Some(src.to_string());
    }

    None
}

fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
}

fn parse_iso_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    // Timezone-less variants some CMSes emit; read as UTC
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Concatenated text of an element, skipping script/style/iframe subtrees
/// and anything marked with the `ad` class.
fn element_text_without_noise(root: ElementRef) -> String {
    let mut out = String::new();

    for node in root.descendants() {
        let scraper::Node::Text(fragment) = node.value() else {
            continue;
        };

        let noisy = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| {
                matches!(element.name(), "script" | "style" | "iframe" | "noscript")
                    || element.classes().any(|class| class == "ad")
            });

        if !noisy {
            out.push_str(fragment);
            out.push(' ');
        }
    }

    out
}
