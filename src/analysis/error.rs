//! Errors raised by the text analysis pipeline

use thiserror::Error;

/// Failure modes of the analysis functions
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// The text has no scorable words (empty, whitespace, or only stop-words)
    #[error("document has no scorable text")]
    EmptyContent,

    /// One or both inputs to the similarity scorer are empty
    #[error("cannot compare an empty document")]
    DocumentEmpty,

    /// The hosted summarization backend failed or timed out
    #[error("summary unavailable: {0}")]
    SummaryUnavailable(String),
}
