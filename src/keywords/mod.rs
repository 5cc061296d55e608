//! Keyword extraction over sentence embeddings.
//!
//! Candidates are Korean unigrams and bigrams from the cleaned text. The
//! document and every candidate are embedded in one batch; candidates are
//! then picked by maximal marginal relevance so near-duplicates do not crowd
//! the list. If embedding fails, a term-frequency ranking stands in so the
//! pipeline still returns keywords.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::warn;

use crate::inference::TextEmbedder;
use crate::text;

/// Relevance/novelty trade-off for marginal-relevance selection.
const DIVERSITY: f32 = 0.5;

/// Minimum keyword length in characters.
const MIN_KEYWORD_CHARS: usize = 2;

static KOREAN_WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[가-힣]{2,}").unwrap());

/// Function words and reporting boilerplate that make poor keywords.
/// Candidates containing any of these as a substring are rejected.
const STOPWORDS: &[&str] = &[
    "있다", "하다", "되다", "이다", "않다", "없다", "같다", "보다", "대한", "통해",
    "위해", "따라", "관련", "대해", "가장", "또한", "그리고", "하지만", "그러나",
    "따라서", "그래서", "때문에", "것으로", "것이다", "것이며", "수도", "가능",
    "있는", "하는", "이번", "지난", "오늘", "내일", "어제", "올해", "작년", "내년",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    /// Cosine similarity to the document, or relative frequency when the
    /// embedding model was unavailable. Rounded to four decimal places.
    pub score: f64,
}

pub struct KeywordService {
    embedder: Arc<dyn TextEmbedder>,
}

impl KeywordService {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Extract up to `top_k` keywords from `text`, best first.
    pub async fn extract(&self, text: &str, top_k: usize) -> Vec<KeywordRecord> {
        if text.trim().is_empty() || top_k == 0 {
            return Vec::new();
        }

        let cleaned = text::clean_text(&text::remove_emails(&text::remove_urls(text)));
        let candidates = build_candidates(&cleaned);
        if candidates.is_empty() {
            return Vec::new();
        }

        // one batch: document first, then every candidate
        let mut inputs = Vec::with_capacity(candidates.len() + 1);
        inputs.push(cleaned.clone());
        inputs.extend(candidates.iter().cloned());

        match self.embedder.embed(&inputs).await {
            Ok(vectors) if vectors.len() == inputs.len() => {
                rank_by_relevance(&candidates, &vectors, top_k)
            }
            Ok(vectors) => {
                warn!(
                    expected = inputs.len(),
                    got = vectors.len(),
                    "embedding count mismatch, using frequency ranking"
                );
                frequency_ranking(&cleaned, top_k)
            }
            Err(e) => {
                warn!("keyword embedding failed, using frequency ranking: {e}");
                frequency_ranking(&cleaned, top_k)
            }
        }
    }
}

/// Unique Korean unigrams and adjacent bigrams, in order of appearance.
fn build_candidates(text: &str) -> Vec<String> {
    let words: Vec<&str> = KOREAN_WORD_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();

    let mut candidates = Vec::new();
    let mut seen = HashMap::new();
    let mut push = |candidate: String| {
        if seen.insert(candidate.clone(), ()).is_none() {
            candidates.push(candidate);
        }
    };

    for word in &words {
        push(word.to_string());
    }
    for pair in words.windows(2) {
        push(format!("{} {}", pair[0], pair[1]));
    }
    candidates
}

/// Select candidates by maximal marginal relevance against the document
/// embedding, drop invalid ones, keep the best `top_k`.
fn rank_by_relevance(
    candidates: &[String],
    vectors: &[Vec<f32>],
    top_k: usize,
) -> Vec<KeywordRecord> {
    let doc = &vectors[0];
    let candidate_vectors = &vectors[1..];

    let doc_similarities: Vec<f32> = candidate_vectors
        .iter()
        .map(|v| cosine_similarity(v, doc))
        .collect();

    // overselect so the validity filter below still leaves top_k entries
    let selected = marginal_relevance(
        &doc_similarities,
        candidate_vectors,
        (top_k * 2).min(candidates.len()),
    );

    let mut records: Vec<KeywordRecord> = selected
        .into_iter()
        .filter(|&idx| is_valid_keyword(&candidates[idx]))
        .map(|idx| KeywordRecord {
            keyword: candidates[idx].clone(),
            score: round4(doc_similarities[idx] as f64),
        })
        .collect();
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records.truncate(top_k);
    records
}

/// Greedy marginal-relevance selection: each round picks the candidate with
/// the best balance of document similarity and distance from the already
/// selected set.
fn marginal_relevance(
    doc_similarities: &[f32],
    candidate_vectors: &[Vec<f32>],
    select_count: usize,
) -> Vec<usize> {
    let count = candidate_vectors.len();
    if count == 0 || select_count == 0 {
        return Vec::new();
    }

    let first = (0..count)
        .max_by(|&a, &b| doc_similarities[a].total_cmp(&doc_similarities[b]))
        .unwrap_or(0);
    let mut selected = vec![first];
    let mut remaining: Vec<usize> = (0..count).filter(|&i| i != first).collect();

    while selected.len() < select_count && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f32::NEG_INFINITY;

        for (pos, &idx) in remaining.iter().enumerate() {
            let max_selected_sim = selected
                .iter()
                .map(|&s| cosine_similarity(&candidate_vectors[idx], &candidate_vectors[s]))
                .fold(f32::NEG_INFINITY, f32::max);
            let score = (1.0 - DIVERSITY) * doc_similarities[idx] - DIVERSITY * max_selected_sim;
            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }
        selected.push(remaining.swap_remove(best_pos));
    }
    selected
}

/// Fallback ranking when no embeddings are available: term frequency,
/// exact stop-word filtering, scores scaled to the most frequent term.
fn frequency_ranking(text: &str, top_k: usize) -> Vec<KeywordRecord> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for m in KOREAN_WORD_REGEX.find_iter(text) {
        let word = m.as_str();
        if STOPWORDS.contains(&word) {
            continue;
        }
        let entry = counts.entry(word).or_insert(0);
        if *entry == 0 {
            order.push(word);
        }
        *entry += 1;
    }

    // stable: frequency descending, first appearance breaks ties
    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|w| (w, counts[w])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let max_count = match ranked.first() {
        Some((_, count)) => *count as f64,
        None => return Vec::new(),
    };

    ranked
        .into_iter()
        .take(top_k)
        .map(|(word, count)| KeywordRecord {
            keyword: word.to_string(),
            score: round4(count as f64 / max_count),
        })
        .collect()
}

fn is_valid_keyword(keyword: &str) -> bool {
    keyword.chars().count() >= MIN_KEYWORD_CHARS
        && !keyword.chars().all(|c| c.is_ascii_digit())
        && !STOPWORDS.iter().any(|stop| keyword.contains(stop))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Render keywords as a hashtag line for display.
pub fn format_as_tags(keywords: &[KeywordRecord]) -> String {
    keywords
        .iter()
        .map(|k| format!("#{}", k.keyword))
        .collect::<Vec<_>>()
        .join(" ")
}
