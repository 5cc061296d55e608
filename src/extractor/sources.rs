//! Outlet-name mapping for known Korean news domains.

use url::Url;

/// Domain substring → outlet display name.
const SUPPORTED_SITES: [(&str, &str); 8] = [
    ("naver.com", "네이버 뉴스"),
    ("daum.net", "다음 뉴스"),
    ("chosun.com", "조선일보"),
    ("donga.com", "동아일보"),
    ("joongang.co.kr", "중앙일보"),
    ("hani.co.kr", "한겨레"),
    ("khan.co.kr", "경향신문"),
    ("yonhapnews.co.kr", "연합뉴스"),
];

/// Outlet name for a URL. Unlisted domains return the raw host string.
pub fn source_name(url: &Url) -> String {
    let Some(host) = url.host_str() else {
        return String::new();
    };
    let host = host.to_lowercase();

    SUPPORTED_SITES
        .iter()
        .find(|(domain, _)| host.contains(domain))
        .map(|(_, name)| name.to_string())
        .unwrap_or(host)
}
