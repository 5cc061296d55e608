//! Three-way sentiment analysis with sentence-level aggregation.
//!
//! The classifier exposes only its top label, so short-text score maps are
//! an estimate: the winner gets the reported confidence and the remaining
//! probability mass is split evenly between the other two labels. Long text
//! is classified per sentence and averaged. Inference failures always
//! degrade to the neutral/zero record, never an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::inference::TextClassifier;
use crate::text;

pub const POSITIVE: &str = "긍정";
pub const NEGATIVE: &str = "부정";
pub const NEUTRAL: &str = "중립";

/// Model input cap in characters; beyond twice this, text is split into
/// sentences and aggregated.
const MAX_LENGTH: usize = 512;

/// Sentences shorter than this carry no reliable signal and are skipped.
const MIN_SENTENCE_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub label: String,
    pub confidence: f64,
    pub scores: BTreeMap<String, f64>,
}

impl SentimentRecord {
    /// Fallback for empty input and failed inference.
    pub fn neutral() -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(POSITIVE.to_string(), 0.0);
        scores.insert(NEGATIVE.to_string(), 0.0);
        scores.insert(NEUTRAL.to_string(), 1.0);
        Self {
            label: NEUTRAL.to_string(),
            confidence: 0.0,
            scores,
        }
    }

    pub fn label_emoji(&self) -> &'static str {
        match self.label.as_str() {
            POSITIVE => "😊",
            NEGATIVE => "😟",
            NEUTRAL => "😐",
            _ => "❓",
        }
    }

    /// Short human-readable reading of the result.
    pub fn description(&self) -> String {
        let confidence_pct = (self.confidence * 100.0) as u32;

        match self.label.as_str() {
            POSITIVE => match confidence_pct {
                80.. => "이 기사는 매우 긍정적인 내용을 담고 있습니다.",
                60..=79 => "이 기사는 다소 긍정적인 톤을 보입니다.",
                _ => "이 기사는 약간 긍정적인 경향이 있습니다.",
            },
            NEGATIVE => match confidence_pct {
                80.. => "이 기사는 매우 부정적인 내용을 담고 있습니다.",
                60..=79 => "이 기사는 다소 부정적인 톤을 보입니다.",
                _ => "이 기사는 약간 부정적인 경향이 있습니다.",
            },
            _ => "이 기사는 중립적인 톤으로 작성되었습니다.",
        }
        .to_string()
    }
}

/// Model label code → Korean label. Unrecognized codes are handled per
/// call site: passed through on the short path, bucketed as neutral when
/// aggregating sentences.
fn map_raw_label(raw: &str) -> Option<&'static str> {
    match raw {
        "positive" | "LABEL_2" => Some(POSITIVE),
        "negative" | "LABEL_0" => Some(NEGATIVE),
        "neutral" | "LABEL_1" => Some(NEUTRAL),
        _ => None,
    }
}

pub struct SentimentService {
    classifier: Arc<dyn TextClassifier>,
}

impl SentimentService {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    /// Classify `text`. Empty input and any inference failure yield the
    /// neutral record.
    pub async fn analyze(&self, text: &str) -> SentimentRecord {
        if text.trim().is_empty() {
            return SentimentRecord::neutral();
        }

        let text = text::normalize_whitespace(text);

        if text.chars().count() > MAX_LENGTH * 2 {
            return self.analyze_long(&text).await;
        }

        match self.classifier.classify(&truncate_chars(&text, MAX_LENGTH)).await {
            Ok(raw) => {
                let label = match map_raw_label(&raw.label) {
                    Some(known) => known.to_string(),
                    None => {
                        warn!("unrecognized sentiment label '{}'", raw.label);
                        raw.label.clone()
                    }
                };
                let scores = estimate_scores(&label, raw.score);
                SentimentRecord {
                    label,
                    confidence: round4(raw.score),
                    scores,
                }
            }
            Err(e) => {
                warn!("sentiment analysis failed: {e}");
                SentimentRecord::neutral()
            }
        }
    }

    /// Sentence-level aggregation for long text: classify each sentence,
    /// average per-label score sums over the valid count, then renormalize
    /// the averages to sum to 1.
    async fn analyze_long(&self, text: &str) -> SentimentRecord {
        let mut all_scores = BTreeMap::from([
            (POSITIVE.to_string(), 0.0_f64),
            (NEGATIVE.to_string(), 0.0_f64),
            (NEUTRAL.to_string(), 0.0_f64),
        ]);
        let mut valid_count = 0usize;

        for sentence in text::split_sentences(text) {
            if sentence.trim().chars().count() < MIN_SENTENCE_CHARS {
                continue;
            }

            match self
                .classifier
                .classify(&truncate_chars(&sentence, MAX_LENGTH))
                .await
            {
                Ok(raw) => {
                    let label = map_raw_label(&raw.label).unwrap_or(NEUTRAL);
                    *all_scores.get_mut(label).expect("canonical label") += raw.score;
                    valid_count += 1;
                }
                Err(e) => {
                    debug!("sentence classification failed: {e}");
                }
            }
        }

        if valid_count == 0 {
            return SentimentRecord::neutral();
        }

        for score in all_scores.values_mut() {
            *score = round4(*score / valid_count as f64);
        }

        // first label wins ties, in 긍정 < 부정 < 중립 order
        let (final_label, final_confidence) = all_scores
            .iter()
            .fold(None::<(&String, f64)>, |best, (label, score)| match best {
                Some((_, best_score)) if *score <= best_score => best,
                _ => Some((label, *score)),
            })
            .map(|(label, score)| (label.clone(), score))
            .expect("scores are non-empty");

        let total: f64 = all_scores.values().sum();
        if total > 0.0 {
            for score in all_scores.values_mut() {
                *score = round4(*score / total);
            }
        }

        SentimentRecord {
            label: final_label,
            confidence: final_confidence,
            scores: all_scores,
        }
    }
}

/// Estimate a full score map from a single (label, confidence) pair by
/// splitting the residual mass evenly over the other labels. An
/// approximation: the model does not report the true distribution.
fn estimate_scores(label: &str, confidence: f64) -> BTreeMap<String, f64> {
    let mut scores = BTreeMap::from([
        (POSITIVE.to_string(), 0.0_f64),
        (NEGATIVE.to_string(), 0.0_f64),
        (NEUTRAL.to_string(), 0.0_f64),
    ]);
    scores.insert(label.to_string(), round4(confidence));

    let remaining = 1.0 - confidence;
    let others: Vec<String> = scores.keys().filter(|k| *k != label).cloned().collect();
    let share = round4(remaining / others.len() as f64);
    for other in others {
        scores.insert(other, share);
    }
    scores
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceError, MockTextClassifier, RawClassification};

    fn classifier_returning(label: &'static str, score: f64) -> Arc<MockTextClassifier> {
        let mut classifier = MockTextClassifier::new();
        classifier.expect_classify().returning(move |_| {
            Ok(RawClassification {
                label: label.to_string(),
                score,
            })
        });
        Arc::new(classifier)
    }

    #[tokio::test]
    async fn empty_input_is_neutral() {
        let service = SentimentService::new(Arc::new(MockTextClassifier::new()));
        assert_eq!(service.analyze("  ").await, SentimentRecord::neutral());
    }

    #[tokio::test]
    async fn inference_failure_degrades_to_exact_neutral_record() {
        let mut classifier = MockTextClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Err(InferenceError::Malformed("down".into())));
        let service = SentimentService::new(Arc::new(classifier));

        let record = service.analyze("경제가 크게 성장했다.").await;
        assert_eq!(record.label, "중립");
        assert_eq!(record.confidence, 0.0);
        assert_eq!(record.scores[POSITIVE], 0.0);
        assert_eq!(record.scores[NEGATIVE], 0.0);
        assert_eq!(record.scores[NEUTRAL], 1.0);
    }

    #[tokio::test]
    async fn short_text_estimates_residual_mass() {
        let service = SentimentService::new(classifier_returning("positive", 0.9));
        let record = service.analyze("경제가 크게 성장했다.").await;

        assert_eq!(record.label, POSITIVE);
        assert_eq!(record.confidence, 0.9);
        assert_eq!(record.scores[POSITIVE], 0.9);
        assert_eq!(record.scores[NEGATIVE], 0.05);
        assert_eq!(record.scores[NEUTRAL], 0.05);
    }

    #[tokio::test]
    async fn numeric_label_codes_are_translated() {
        let service = SentimentService::new(classifier_returning("LABEL_0", 0.7));
        let record = service.analyze("실적이 크게 악화되었다.").await;
        assert_eq!(record.label, NEGATIVE);
    }

    #[tokio::test]
    async fn unknown_label_passes_through() {
        let service = SentimentService::new(classifier_returning("LABEL_9", 0.8));
        let record = service.analyze("알 수 없는 결과다.").await;

        assert_eq!(record.label, "LABEL_9");
        assert_eq!(record.scores["LABEL_9"], 0.8);
        // residual split across the three canonical labels
        assert_eq!(record.scores[POSITIVE], 0.0667);
        assert_eq!(record.scores.len(), 4);
    }

    #[tokio::test]
    async fn long_text_averages_and_renormalizes() {
        let service = SentimentService::new(classifier_returning("positive", 0.8));
        let text = "경제 성장 소식에 시장이 환호했다. ".repeat(60); // > 1024 chars
        let record = service.analyze(&text).await;

        assert_eq!(record.label, POSITIVE);
        let total: f64 = record.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-3);
        assert!(record.scores.values().all(|s| (0.0..=1.0).contains(s)));
        assert_eq!(record.scores[POSITIVE], 1.0);
    }

    #[tokio::test]
    async fn long_text_skips_short_sentences() {
        let mut classifier = MockTextClassifier::new();
        classifier.expect_classify().times(50).returning(|_| {
            Ok(RawClassification {
                label: "neutral".to_string(),
                score: 0.6,
            })
        });
        let service = SentimentService::new(Arc::new(classifier));

        // each repetition: one long sentence (classified) and one short one
        let text = "충분히 길고 의미가 있는 문장입니다. 짧다! ".repeat(50);
        let record = service.analyze(&text).await;
        assert_eq!(record.label, NEUTRAL);
    }

    #[tokio::test]
    async fn long_text_with_all_failures_is_neutral() {
        let mut classifier = MockTextClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Err(InferenceError::Malformed("down".into())));
        let service = SentimentService::new(Arc::new(classifier));

        let text = "경제 성장 소식에 시장이 환호했다. ".repeat(60);
        let record = service.analyze(&text).await;
        assert_eq!(record, SentimentRecord::neutral());
    }

    #[test]
    fn descriptions_follow_confidence_bands() {
        let mut record = SentimentRecord::neutral();
        record.label = POSITIVE.to_string();
        record.confidence = 0.95;
        assert!(record.description().contains("매우 긍정적"));
        record.confidence = 0.65;
        assert!(record.description().contains("다소 긍정적"));
        record.label = NEUTRAL.to_string();
        assert!(record.description().contains("중립적"));
        assert_eq!(SentimentRecord::neutral().label_emoji(), "😐");
    }
}
