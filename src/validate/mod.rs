pub mod article;
pub mod url;

pub use article::{check_article_text, estimate_read_time};
pub use url::{NewsUrl, check_url, extract_domain, sanitize_url};

use thiserror::Error;

/// Rejections reported before any ML stage runs. Messages are user-facing
/// Korean strings surfaced directly by the presentation layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("올바른 URL 형식이 아닙니다.")]
    InvalidUrl,

    #[error("텍스트가 비어있습니다.")]
    EmptyText,

    #[error("텍스트가 너무 짧습니다. (최소 {min}자)")]
    TextTooShort { min: usize },

    #[error("텍스트가 너무 깁니다. (최대 {max}자)")]
    TextTooLong { max: usize },

    #[error("한국어 콘텐츠가 거의 없습니다.")]
    NotKorean,
}
