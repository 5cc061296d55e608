//! Pure string utilities shared by the extraction and analysis stages.
//!
//! Everything here is synchronous and side-effect free. Lengths are always
//! counted in `char`s, not bytes, because the inputs are Korean text.

use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static NOISE_CHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s가-힣.,!?'"()-]"#).unwrap());

static REPEAT_PERIOD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Strip markup remnants and odd symbols, keeping Korean, alphanumerics and
/// basic punctuation, then collapse whitespace and repeated periods.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = HTML_TAG_REGEX.replace_all(text, "");
    let text = NOISE_CHAR_REGEX.replace_all(&text, " ");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    let text = REPEAT_PERIOD_REGEX.replace_all(&text, ".");
    text.trim().to_string()
}

/// Split text into sentences at terminal punctuation (`.` `!` `?`) followed
/// by whitespace. Keeps the punctuation with the sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            // consume the separating whitespace run
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Truncate to at most `max_chars` characters, preferring a word boundary
/// when one falls in the last fifth of the budget, and append `suffix`.
pub fn truncate_text(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars).collect();
    if let Some(last_space) = truncated.rfind(' ') {
        let boundary_chars = truncated[..last_space].chars().count();
        if boundary_chars * 10 > max_chars * 8 {
            truncated.truncate(last_space);
        }
    }
    format!("{}{}", truncated.trim_end(), suffix)
}

/// Remove `http(s)://...` and `www....` spans.
pub fn remove_urls(text: &str) -> String {
    URL_REGEX.replace_all(text, "").to_string()
}

/// Remove email-address spans.
pub fn remove_emails(text: &str) -> String {
    EMAIL_REGEX.replace_all(text, "").to_string()
}

/// Collapse all whitespace runs (tabs, newlines included) to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Whitespace-delimited word count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Character count, optionally including spaces.
pub fn count_chars(text: &str, include_spaces: bool) -> usize {
    if include_spaces {
        text.chars().count()
    } else {
        text.chars().filter(|c| *c != ' ').count()
    }
}
