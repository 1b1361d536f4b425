//! Pluggable summarization backends
//!
//! The pipeline only sees `SummaryBackend`; which implementation runs is a
//! configuration choice. The hosted implementation lives in
//! `adapters::openai`.

use async_trait::async_trait;

use super::summarizer::ExtractiveSummarizer;
use super::AnalysisError;

/// Something that turns document text into a summary
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Short name used in logs and status output
    fn name(&self) -> &'static str;

    /// Summarize `text`
    ///
    /// Implementations return `EmptyContent` for text with nothing to
    /// summarize and `SummaryUnavailable` for upstream failures.
    async fn summarize(&self, text: &str) -> Result<String, AnalysisError>;
}

/// Local frequency-based extractive backend
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    summarizer: ExtractiveSummarizer,
}

impl LocalBackend {
    pub fn new(summarizer: ExtractiveSummarizer) -> Self {
        Self { summarizer }
    }

    pub fn summarizer(&self) -> &ExtractiveSummarizer {
        &self.summarizer
    }
}

#[async_trait]
impl SummaryBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn summarize(&self, text: &str) -> Result<String, AnalysisError> {
        self.summarizer.summarize(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_backend_summarizes() {
        let backend = LocalBackend::default();
        let summary = backend.summarize("Rust is fast. Rust is safe.").await.unwrap();
        assert_eq!(summary, "Rust is fast. Rust is safe.");
    }

    #[tokio::test]
    async fn test_local_backend_empty() {
        let backend = LocalBackend::default();
        assert_eq!(
            backend.summarize("").await,
            Err(AnalysisError::EmptyContent)
        );
    }
}
