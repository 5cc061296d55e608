//! URL well-formedness and news-domain assessment.

use super::ValidationError;
use url::Url;

/// Known news outlet domains. Matching is by substring against the host, so
/// subdomains like `news.naver.com` resolve too.
const NEWS_DOMAINS: [&str; 16] = [
    "naver.com",
    "daum.net",
    "chosun.com",
    "donga.com",
    "joongang.co.kr",
    "hani.co.kr",
    "khan.co.kr",
    "yonhapnews.co.kr",
    "yna.co.kr",
    "mk.co.kr",
    "hankyung.com",
    "mt.co.kr",
    "sedaily.com",
    "etnews.com",
    "zdnet.co.kr",
    "itworld.co.kr",
];

/// Outcome of assessing a well-formed URL. Unrecognized domains are still
/// analyzed; recognition only informs the caller which outlet matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsUrl {
    /// Host matched the outlet allowlist.
    Supported { domain: &'static str },
    /// Well-formed http(s) URL on an unlisted host; extraction is attempted.
    Unrecognized,
}

/// Trim the input and default to `https://` when no scheme is given.
pub fn sanitize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

/// Validate scheme and host, then assess the domain against the allowlist.
pub fn check_url(url: &str) -> Result<NewsUrl, ValidationError> {
    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl);
    }
    let Some(host) = parsed.host_str() else {
        return Err(ValidationError::InvalidUrl);
    };

    let host = host.strip_prefix("www.").unwrap_or(host).to_lowercase();
    match NEWS_DOMAINS.iter().find(|d| host.contains(*d)) {
        Some(domain) => Ok(NewsUrl::Supported { domain }),
        None => Ok(NewsUrl::Unrecognized),
    }
}

/// Host part of the URL, lowercased, `www.` stripped. Empty for bad URLs.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .map(|h| h.strip_prefix("www.").unwrap_or(&h).to_string())
        .unwrap_or_default()
}
