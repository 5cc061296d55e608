//! Abstractive summarization service.
//!
//! Failures are reported in-band: the record carries the error message and a
//! zero summary length, so later pipeline stages still run. Inputs longer
//! than one chunk go through a two-pass hierarchical reduction.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::inference::{GenerationParams, TextGenerator};
use crate::text;

/// Returned when there is nothing to summarize. Not an error: callers that
/// cannot accept empty input must check before calling.
const EMPTY_INPUT_MESSAGE: &str = "요약할 텍스트가 없습니다.";

/// Default output bounds, in tokens.
pub const DEFAULT_MAX_LENGTH: usize = 150;
pub const DEFAULT_MIN_LENGTH: usize = 50;

/// Chunk summaries are capped short; they only feed the reduction pass.
const CHUNK_SUMMARY_MAX_LENGTH: usize = 100;

/// Default character budget per chunk in the long-text path.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
}

impl SummaryRecord {
    /// Percent of the original saved by the summary, one decimal place.
    /// Exactly `0.0` when there was no original text.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_length == 0 {
            return 0.0;
        }
        let ratio = (1.0 - self.summary_length as f64 / self.original_length as f64) * 100.0;
        (ratio * 10.0).round() / 10.0
    }
}

pub struct SummarizerService {
    generator: Arc<dyn TextGenerator>,
}

impl SummarizerService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarize `text` into `[min_length, max_length]` output tokens.
    pub async fn summarize(
        &self,
        text: &str,
        max_length: Option<usize>,
        min_length: Option<usize>,
    ) -> SummaryRecord {
        if text.trim().is_empty() {
            return SummaryRecord {
                summary: EMPTY_INPUT_MESSAGE.to_string(),
                original_length: 0,
                summary_length: 0,
            };
        }

        let original_length = text.chars().count();
        let text = text::normalize_whitespace(text);

        let params = GenerationParams {
            max_new_tokens: max_length.unwrap_or(DEFAULT_MAX_LENGTH),
            min_new_tokens: min_length.unwrap_or(DEFAULT_MIN_LENGTH),
            ..GenerationParams::default()
        };

        match self.generator.generate(&text, &params).await {
            Ok(raw) => {
                let summary = postprocess(&raw);
                SummaryRecord {
                    summary_length: summary.chars().count(),
                    summary,
                    original_length,
                }
            }
            Err(e) => {
                warn!("summary generation failed: {e}");
                SummaryRecord {
                    summary: format!("요약 생성 중 오류가 발생했습니다: {e}"),
                    original_length,
                    summary_length: 0,
                }
            }
        }
    }

    /// Two-pass reduction for text beyond the model's effective context:
    /// summarize sentence-respecting chunks, then summarize the
    /// concatenated chunk summaries under the caller's bounds.
    pub async fn summarize_long(
        &self,
        text: &str,
        chunk_size: usize,
        max_length: Option<usize>,
        min_length: Option<usize>,
    ) -> SummaryRecord {
        let original_length = text.chars().count();

        if original_length <= chunk_size {
            return self.summarize(text, max_length, min_length).await;
        }

        let chunks = split_into_chunks(text, chunk_size);
        info!("split text into {} chunks", chunks.len());

        let mut chunk_summaries = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            info!("summarizing chunk {}/{}", i + 1, chunks.len());
            let result = self
                .summarize(chunk, Some(CHUNK_SUMMARY_MAX_LENGTH), None)
                .await;
            chunk_summaries.push(result.summary);
        }

        let combined = chunk_summaries.join(" ");
        let final_result = self.summarize(&combined, max_length, min_length).await;

        SummaryRecord {
            summary_length: final_result.summary.chars().count(),
            summary: final_result.summary,
            original_length,
        }
    }
}

/// Append closing punctuation when the decoded summary lacks it.
fn postprocess(summary: &str) -> String {
    let mut summary = summary.trim().to_string();
    let ends_closed = summary
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '.' | '다' | '요' | '!'));
    if !summary.is_empty() && !ends_closed {
        summary.push('.');
    }
    summary
}

/// Greedy sentence packing into chunks of at most `chunk_size` chars.
/// A single overlong sentence becomes its own chunk.
fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let sentences = text::split_sentences(text);

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences {
        let current_len = current.chars().count();
        let sentence_len = sentence.chars().count();
        if current_len + sentence_len <= chunk_size {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&sentence);
        } else {
            if !current.is_empty() {
                chunks.push(current.clone());
            }
            current = sentence;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceError, MockTextGenerator};

    fn service_returning(summary: &'static str) -> SummarizerService {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(move |_, _| Ok(summary.to_string()));
        SummarizerService::new(Arc::new(generator))
    }

    #[tokio::test]
    async fn empty_input_yields_placeholder_without_model_call() {
        // no expectations set: any generate call would panic
        let service = SummarizerService::new(Arc::new(MockTextGenerator::new()));
        let record = service.summarize("   ", None, None).await;

        assert_eq!(record.summary, "요약할 텍스트가 없습니다.");
        assert_eq!(record.original_length, 0);
        assert_eq!(record.summary_length, 0);
        assert_eq!(record.compression_ratio(), 0.0);
    }

    #[tokio::test]
    async fn summarizes_and_appends_punctuation() {
        let service = service_returning("경제가 성장했다는 내용");
        let record = service.summarize(&"기사 본문. ".repeat(20), None, None).await;

        assert_eq!(record.summary, "경제가 성장했다는 내용.");
        assert_eq!(record.summary_length, record.summary.chars().count());
        assert!(record.original_length > 0);
    }

    #[tokio::test]
    async fn keeps_existing_terminal_punctuation() {
        let service = service_returning("성장세가 이어질 전망이다");
        let record = service.summarize("기사 본문입니다.", None, None).await;
        // '다' already closes the sentence
        assert_eq!(record.summary, "성장세가 이어질 전망이다");
    }

    #[tokio::test]
    async fn model_failure_is_reported_in_band() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(InferenceError::Malformed("boom".into())));
        let service = SummarizerService::new(Arc::new(generator));

        let record = service.summarize("기사 본문입니다.", None, None).await;
        assert!(record.summary.contains("요약 생성 중 오류가 발생했습니다"));
        assert_eq!(record.summary_length, 0);
        assert_eq!(record.original_length, "기사 본문입니다.".chars().count());
    }

    #[tokio::test]
    async fn bounds_are_forwarded_to_the_model() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|_, params| {
                params.max_new_tokens == 80
                    && params.min_new_tokens == 30
                    && params.num_beams == 4
                    && params.length_penalty == 2.0
                    && params.no_repeat_ngram_size == 3
                    && params.early_stopping
                    && params.truncation_length == 1024
            })
            .returning(|_, _| Ok("요약.".to_string()));
        let service = SummarizerService::new(Arc::new(generator));

        let record = service.summarize("본문", Some(80), Some(30)).await;
        assert_eq!(record.summary, "요약.");
    }

    #[tokio::test]
    async fn long_text_runs_chunks_plus_reduction() {
        let mut generator = MockTextGenerator::new();
        // 3 chunk passes + 1 reduction pass
        generator
            .expect_generate()
            .times(4)
            .returning(|_, _| Ok("부분 요약.".to_string()));
        let service = SummarizerService::new(Arc::new(generator));

        // ~25 chars per sentence, 120 sentences => ~3000 chars, chunk 1000
        let sentence = "경제 지표가 눈에 띄게 개선되었다는 평가다. ";
        let text = sentence.repeat(120);
        let record = service.summarize_long(&text, 1000, None, None).await;

        assert_eq!(record.summary, "부분 요약.");
        assert_eq!(record.original_length, text.chars().count());
    }

    #[tokio::test]
    async fn short_text_skips_chunking() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok("요약.".to_string()));
        let service = SummarizerService::new(Arc::new(generator));

        let record = service
            .summarize_long("짧은 기사 본문입니다.", 1000, None, None)
            .await;
        assert_eq!(record.summary, "요약.");
    }

    #[test]
    fn compression_ratio_rounds_to_one_decimal() {
        let record = SummaryRecord {
            summary: String::new(),
            original_length: 300,
            summary_length: 100,
        };
        assert_eq!(record.compression_ratio(), 66.7);

        let record = SummaryRecord {
            summary: String::new(),
            original_length: 0,
            summary_length: 0,
        };
        assert_eq!(record.compression_ratio(), 0.0);
    }

    #[test]
    fn chunking_respects_sentence_boundaries() {
        let text = "첫 문장이다. 둘째 문장이다. 셋째 문장이다.";
        let chunks = split_into_chunks(text, 16);
        assert_eq!(chunks, vec!["첫 문장이다. 둘째 문장이다.", "셋째 문장이다."]);
    }
}
