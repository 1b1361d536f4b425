//! Text analysis pipeline
//!
//! Stateless functions over extracted document text:
//! - Extractive summarization (`summarizer`)
//! - TF-IDF cosine similarity (`similarity`)
//! - Common-span highlighting (`highlight`)
//! - Date extraction (`dates`)
//!
//! Nothing here touches storage, files, or the network.

pub mod backend;
pub mod dates;
pub mod error;
pub mod highlight;
pub mod similarity;
pub mod summarizer;
pub mod text;

pub use backend::{LocalBackend, SummaryBackend};
pub use dates::{extract_dates, join_dates, DateFormat, ExtractedDate};
pub use error::AnalysisError;
pub use highlight::{highlight, highlight_tokens, HighlightMarker, HighlightedPair, SequenceMatcher};
pub use similarity::similarity;
pub use summarizer::{
    summarize, ExtractiveSummarizer, SentenceOrder, SentenceScore, WordFrequencyTable,
    DEFAULT_SENTENCE_COUNT,
};
pub use text::StopWords;
