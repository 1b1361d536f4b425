//! TF-IDF cosine similarity between two documents
//!
//! The vector space is fitted on exactly the two documents being compared.
//! Tokens are runs of two or more word characters, lowercased. Weights use
//! raw term counts and smoothed IDF `ln((1 + n) / (1 + df)) + 1`, and every
//! row is L2-normalized before the dot product.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::AnalysisError;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Sparse TF-IDF row keyed by term
pub type TermVector = BTreeMap<String, f64>;

/// Vectorizer tokens for `text`
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fit TF-IDF on `documents` and return one L2-normalized row per document
pub fn tfidf_vectors(documents: &[&str]) -> Vec<TermVector> {
    let counts: Vec<BTreeMap<String, f64>> = documents
        .iter()
        .map(|doc| {
            let mut tf = BTreeMap::new();
            for token in tokenize(doc) {
                *tf.entry(token).or_insert(0.0) += 1.0;
            }
            tf
        })
        .collect();

    let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
    for tf in &counts {
        for term in tf.keys() {
            *document_frequency.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = documents.len() as f64;
    let idf: BTreeMap<&str, f64> = document_frequency
        .iter()
        .map(|(term, &df)| (*term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
        .collect();

    counts
        .iter()
        .map(|tf| {
            let mut row: TermVector = tf
                .iter()
                .map(|(term, count)| (term.clone(), count * idf[term.as_str()]))
                .collect();

            let norm = row.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in row.values_mut() {
                    *weight /= norm;
                }
            }
            row
        })
        .collect()
}

/// Cosine of two rows; both rows are already unit length
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}

/// Similarity of two documents as a percentage in [0, 100]
pub fn similarity(text1: &str, text2: &str) -> Result<f64, AnalysisError> {
    if text1.trim().is_empty() || text2.trim().is_empty() {
        return Err(AnalysisError::DocumentEmpty);
    }

    let rows = tfidf_vectors(&[text1, text2]);
    if rows.iter().any(|row| row.is_empty()) {
        return Err(AnalysisError::DocumentEmpty);
    }

    Ok((cosine(&rows[0], &rows[1]) * 100.0).clamp(0.0, 100.0))
}
