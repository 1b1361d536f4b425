//! Tokenization helpers shared by the summarizer
//!
//! Words come from Unicode word segmentation, so punctuation never shows up
//! as a token. Sentences come from Unicode sentence boundaries.

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Common English stop-words (the NLTK list)
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what",
    "which", "who", "whom", "this", "that", "that'll", "these", "those", "am", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn",
    "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn",
    "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't",
    "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// A set of lowercase words excluded from frequency scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Build from an arbitrary word list (entries are lowercased)
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// The English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOP_WORDS.iter().copied())
    }

    /// An empty list: every word is scorable
    pub fn none() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

/// Lowercased words of `text`, punctuation excluded
pub fn words(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

/// Words that count toward frequency scoring
pub fn scorable_words(text: &str, stop_words: &StopWords) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| !stop_words.contains(w))
        .collect()
}

/// Rejoin lines wrapped inside a paragraph
///
/// Whitespace runs collapse to one space. Blank lines stay as paragraph
/// breaks (`\n\n`).
pub fn unwrap_lines(text: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
            continue;
        }
        current.extend(line.split_whitespace());
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}

/// Sentences of `text`, wrapped lines rejoined; blank spans dropped
pub fn sentences(text: &str) -> Vec<String> {
    unwrap_lines(text)
        .unicode_sentences()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_drop_punctuation() {
        let tokens = words("Hello, World! Rust; is... fast?");
        assert_eq!(tokens, vec!["hello", "world", "rust", "is", "fast"]);
    }

    #[test]
    fn test_scorable_words_skip_stop_words() {
        let tokens = scorable_words("The cat and the hat", &StopWords::english());
        assert_eq!(tokens, vec!["cat", "hat"]);
    }

    #[test]
    fn test_only_stop_words() {
        assert!(scorable_words("the and or but", &StopWords::english()).is_empty());
    }

    #[test]
    fn test_custom_stop_words_are_lowercased() {
        let stop = StopWords::from_words(["Rust"]);
        assert!(stop.contains("rust"));
        assert_eq!(scorable_words("Rust rocks", &stop), vec!["rocks"]);
    }

    #[test]
    fn test_sentences_trimmed() {
        let parts = sentences("First one. Second one!  Third?");
        assert_eq!(parts, vec!["First one.", "Second one!", "Third?"]);
    }

    #[test]
    fn test_sentences_across_wrapped_lines() {
        let parts = sentences(
            "This is a long\nsentence that wraps across lines.\nSecond one here.",
        );
        assert_eq!(
            parts,
            vec!["This is a long sentence that wraps across lines.", "Second one here."]
        );
    }

    #[test]
    fn test_blank_line_is_a_hard_break() {
        let parts = sentences("Quarterly report\n\nRevenue grew\r\nagain this year.");
        assert_eq!(parts, vec!["Quarterly report", "Revenue grew again this year."]);
    }

    #[test]
    fn test_unwrap_lines() {
        assert_eq!(unwrap_lines("a  b\n c\n\n\n d \n"), "a b c\n\nd");
        assert_eq!(unwrap_lines(" \n "), "");
    }

    #[test]
    fn test_sentences_empty() {
        assert!(sentences("   \n ").is_empty());
    }
}
