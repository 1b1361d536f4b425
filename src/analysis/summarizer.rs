//! Frequency-based extractive summarizer
//!
//! Scores each sentence by the normalized frequency of its words and keeps the
//! highest-scoring ones. No text is generated; the summary is a selection of
//! sentences from the source.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::text::{scorable_words, sentences, words, StopWords};
use super::AnalysisError;

/// Sentences kept by default
pub const DEFAULT_SENTENCE_COUNT: usize = 5;

/// Order of the selected sentences in the summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentenceOrder {
    /// Order in which the sentences appear in the document
    #[default]
    Document,
    /// Highest score first
    Score,
}

/// Normalized word frequencies for one document
///
/// Each value is the raw count divided by the largest raw count, so the most
/// frequent word maps to 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct WordFrequencyTable {
    frequencies: HashMap<String, f64>,
}

impl WordFrequencyTable {
    /// Count scorable words in `text` and normalize by the maximum count
    pub fn build(text: &str, stop_words: &StopWords) -> Result<Self, AnalysisError> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in scorable_words(text, stop_words) {
            *counts.entry(word).or_insert(0) += 1;
        }

        let max = counts.values().copied().max().unwrap_or(0);
        if max == 0 {
            return Err(AnalysisError::EmptyContent);
        }

        let frequencies = counts
            .into_iter()
            .map(|(word, count)| (word, count as f64 / max as f64))
            .collect();

        Ok(Self { frequencies })
    }

    /// Frequency of `word`, or 0.0 when it is not scorable
    pub fn get(&self, word: &str) -> f64 {
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// A sentence with its position in the document and its score
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceScore {
    pub index: usize,
    pub sentence: String,
    pub score: f64,
}

/// Extractive summarizer configuration
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    sentence_count: usize,
    order: SentenceOrder,
    stop_words: StopWords,
}

impl ExtractiveSummarizer {
    pub fn new(sentence_count: usize, order: SentenceOrder, stop_words: StopWords) -> Self {
        Self {
            sentence_count: sentence_count.max(1),
            order,
            stop_words,
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn order(&self) -> SentenceOrder {
        self.order
    }

    /// Score every sentence of `text` against `table`
    pub fn score_sentences(&self, text: &str, table: &WordFrequencyTable) -> Vec<SentenceScore> {
        sentences(text)
            .into_iter()
            .enumerate()
            .map(|(index, sentence)| {
                let score = words(&sentence).iter().map(|w| table.get(w)).sum();
                SentenceScore {
                    index,
                    sentence,
                    score,
                }
            })
            .collect()
    }

    /// Summarize `text` into at most `sentence_count` sentences
    pub fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyContent);
        }

        let table = WordFrequencyTable::build(text, &self.stop_words)?;
        let mut scored = self.score_sentences(text, &table);

        // Stable sort: equal scores keep first-seen order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.sentence_count);

        if self.order == SentenceOrder::Document {
            scored.sort_by_key(|s| s.index);
        }

        let summary = scored
            .iter()
            .map(|s| s.sentence.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(summary)
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(
            DEFAULT_SENTENCE_COUNT,
            SentenceOrder::Document,
            StopWords::english(),
        )
    }
}

/// Summarize with English stop-words and document order
pub fn summarize(text: &str, sentence_count: usize) -> Result<String, AnalysisError> {
    ExtractiveSummarizer::new(sentence_count, SentenceOrder::Document, StopWords::english())
        .summarize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Rust is a systems language. \
        The weather was pleasant today. \
        Rust programs are fast and Rust programs are safe. \
        Cats sleep a lot.";

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(summarize("", 5), Err(AnalysisError::EmptyContent));
        assert_eq!(summarize("   \n\t", 5), Err(AnalysisError::EmptyContent));
    }

    #[test]
    fn test_only_stop_words_fails() {
        assert_eq!(
            summarize("The and the. Or but if.", 3),
            Err(AnalysisError::EmptyContent)
        );
    }

    #[test]
    fn test_frequency_table_normalized() {
        let table = WordFrequencyTable::build(TEXT, &StopWords::english()).unwrap();
        assert_eq!(table.get("rust"), 1.0);
        assert!((table.get("programs") - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(table.get("the"), 0.0);
        assert_eq!(table.get("missing"), 0.0);
    }

    #[test]
    fn test_single_sentence_shorter_than_n() {
        let summary = summarize("Only one sentence lives here.", 5).unwrap();
        assert_eq!(summary, "Only one sentence lives here.");
    }

    #[test]
    fn test_top_sentences_in_document_order() {
        let summary = summarize(TEXT, 2).unwrap();
        assert_eq!(
            summary,
            "Rust is a systems language. Rust programs are fast and Rust programs are safe."
        );
    }

    #[test]
    fn test_score_order() {
        let summarizer = ExtractiveSummarizer::new(2, SentenceOrder::Score, StopWords::english());
        let summary = summarizer.summarize(TEXT).unwrap();
        assert_eq!(
            summary,
            "Rust programs are fast and Rust programs are safe. Rust is a systems language."
        );
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let text = "Alpha beta. Gamma delta. Epsilon zeta.";
        let summarizer = ExtractiveSummarizer::new(2, SentenceOrder::Score, StopWords::english());
        assert_eq!(summarizer.summarize(text).unwrap(), "Alpha beta. Gamma delta.");
    }

    #[test]
    fn test_wrapped_lines_summarized_as_sentences() {
        let text = "Rust is a language that\n\
            empowers everyone to build reliable software.\n\
            Cats sleep.";
        assert_eq!(
            summarize(text, 1).unwrap(),
            "Rust is a language that empowers everyone to build reliable software."
        );
    }

    #[test]
    fn test_idempotent() {
        let summarizer = ExtractiveSummarizer::default();
        let first = summarizer.summarize(TEXT).unwrap();
        let second = summarizer.summarize(TEXT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_count_clamped() {
        let summarizer =
            ExtractiveSummarizer::new(0, SentenceOrder::Document, StopWords::english());
        assert_eq!(summarizer.sentence_count(), 1);
    }
}
