//! Charset detection and decoding of fetched pages.
//!
//! Korean news sites still serve EUC-KR alongside UTF-8, and several lie in
//! their headers, so the charset is resolved in order of trustworthiness:
//! Content-Type header, `<meta>` declarations in the first 4KB, then a
//! statistical guess over the same prefix.

use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use url::Url;

use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};

/// Only this prefix is scanned for meta declarations and fed to the
/// statistical detector. Declarations are required to appear early anyway.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset)?;

    Ok(PageResponse {
        url_final,
        status,
        headers,
        body_raw: body_bytes,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

fn encoding_from_capture(text: &str, regex: &Regex) -> Option<&'static Encoding> {
    let captures = regex.captures(text)?;
    let label = captures.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    if let Some(encoding) = encoding_from_capture(content_type, &HEADER_CHARSET_REGEX) {
        return Charset::from_encoding(encoding);
    }

    let sniff = String::from_utf8_lossy(&body_bytes[..body_bytes.len().min(SNIFF_WINDOW)]);
    for regex in [&META_CHARSET_REGEX, &META_HTTP_EQUIV_REGEX] {
        if let Some(encoding) = encoding_from_capture(&sniff, regex) {
            return Charset::from_encoding(encoding);
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body_bytes[..body_bytes.len().min(SNIFF_WINDOW)], false);
    Charset::from_encoding(detector.guess(None, true))
}

fn decode_to_utf8(body_bytes: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);

    if had_errors {
        return Err(FetchError::Charset(format!(
            "undecodable bytes for declared encoding {}",
            encoding.name()
        )));
    }

    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_from_content_type_header() {
        let charset = detect_charset("text/html; charset=utf-8", b"<html></html>");
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"euc-kr\"><title>\xB4\xBA\xBD\xBA</title></head></html>";
        let charset = detect_charset("text/html", body);
        assert!(matches!(charset, Charset::EucKr));
    }

    #[test]
    fn charset_from_http_equiv_meta() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head></html>";
        let charset = detect_charset("text/html", body);
        assert!(matches!(charset, Charset::Windows1252));
    }

    #[test]
    fn header_charset_beats_meta() {
        let body = b"<html><head><meta charset=\"euc-kr\"></head></html>";
        let charset = detect_charset("text/html; charset=utf-8", body);
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn decode_utf8_body() {
        let decoded = decode_to_utf8("안녕하세요, 경제 뉴스입니다.".as_bytes(), &Charset::Utf8).unwrap();
        assert_eq!(decoded, "안녕하세요, 경제 뉴스입니다.");
    }

    #[test]
    fn decode_euc_kr_body() {
        // "뉴스" in EUC-KR
        let body: &[u8] = &[0xB4, 0xBA, 0xBD, 0xBA];
        let decoded = decode_to_utf8(body, &Charset::EucKr).unwrap();
        assert_eq!(decoded, "뉴스");
    }
}
