//! Analysis service
//!
//! One configurable pipeline over the stateless analysis functions:
//! - Summaries come from the configured `SummaryBackend`
//! - Backend outages are replaced with the fallback placeholder
//! - Dates, similarity and highlighting run locally

use tracing::{debug, info, warn};

use crate::adapters::HostedBackend;
use crate::analysis::{
    extract_dates, highlight, similarity, AnalysisError, ExtractedDate, ExtractiveSummarizer,
    HighlightMarker, HighlightedPair, LocalBackend, StopWords, SummaryBackend,
};
use crate::config::{AppSettings, BackendKind, LocalSettings};
use crate::models::BackendStatus;

/// Result of a summarization attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryOutcome {
    /// The backend produced a summary
    Generated(String),
    /// The backend was unavailable; the placeholder stands in
    Fallback { placeholder: String, reason: String },
}

impl SummaryOutcome {
    pub fn text(&self) -> &str {
        match self {
            SummaryOutcome::Generated(summary) => summary,
            SummaryOutcome::Fallback { placeholder, .. } => placeholder,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SummaryOutcome::Fallback { .. })
    }
}

/// Summary and dates for one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAnalysis {
    pub summary: SummaryOutcome,
    pub dates: Vec<ExtractedDate>,
}

/// Similarity and highlighted texts for a pair of documents
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentComparison {
    pub similarity: f64,
    pub highlighted: HighlightedPair,
}

/// Text analysis pipeline with a pluggable summarizer
pub struct AnalysisService {
    backend: Box<dyn SummaryBackend>,
    fallback_summary: String,
    marker: HighlightMarker,
}

impl AnalysisService {
    pub fn new(
        backend: Box<dyn SummaryBackend>,
        fallback_summary: impl Into<String>,
        marker: HighlightMarker,
    ) -> Self {
        Self {
            backend,
            fallback_summary: fallback_summary.into(),
            marker,
        }
    }

    /// Build the pipeline selected by `settings.summarizer.backend`
    ///
    /// Never fails: a hosted backend that cannot reach its API falls back
    /// per call.
    pub fn from_settings(settings: &AppSettings) -> Self {
        let backend: Box<dyn SummaryBackend> = match settings.summarizer.backend {
            BackendKind::Local => Box::new(local_backend(&settings.summarizer.local)),
            BackendKind::Hosted => {
                Box::new(HostedBackend::from_settings(&settings.summarizer.hosted))
            }
        };

        info!("Using {} summarizer backend", backend.name());
        Self::new(
            backend,
            settings.fallback_summary.clone(),
            settings.highlight.clone(),
        )
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn fallback_summary(&self) -> &str {
        &self.fallback_summary
    }

    /// Summarize `text`
    ///
    /// Empty text is an error. A backend outage is not: it yields the
    /// fallback placeholder.
    pub async fn summarize(&self, text: &str) -> Result<SummaryOutcome, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyContent);
        }

        match self.backend.summarize(text).await {
            Ok(summary) => {
                debug!("Summary generated ({} chars)", summary.len());
                Ok(SummaryOutcome::Generated(summary))
            }
            Err(AnalysisError::SummaryUnavailable(reason)) => {
                warn!(
                    "{} backend unavailable, using fallback summary: {}",
                    self.backend.name(),
                    reason
                );
                Ok(SummaryOutcome::Fallback {
                    placeholder: self.fallback_summary.clone(),
                    reason,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Summary plus dates for one document
    pub async fn analyze(&self, text: &str) -> Result<DocumentAnalysis, AnalysisError> {
        let summary = self.summarize(text).await?;
        let dates = extract_dates(text);
        debug!("Found {} dates", dates.len());
        Ok(DocumentAnalysis { summary, dates })
    }

    /// Similarity percentage and highlighted common runs
    pub fn compare(&self, text1: &str, text2: &str) -> Result<DocumentComparison, AnalysisError> {
        let similarity = similarity(text1, text2)?;
        let highlighted = highlight(text1, text2, &self.marker);
        Ok(DocumentComparison {
            similarity,
            highlighted,
        })
    }
}

/// Local backend from settings
pub fn local_backend(settings: &LocalSettings) -> LocalBackend {
    let stop_words = match &settings.stop_words {
        Some(words) => StopWords::from_words(words),
        None => StopWords::english(),
    };
    LocalBackend::new(ExtractiveSummarizer::new(
        settings.sentence_count,
        settings.sentence_order,
        stop_words,
    ))
}

/// Whether the configured backend can run right now
pub fn backend_status(settings: &AppSettings) -> BackendStatus {
    match settings.summarizer.backend {
        BackendKind::Local => BackendStatus {
            backend: "local".to_string(),
            ready: true,
            detail: Some(format!(
                "{} sentences, {:?} order",
                settings.summarizer.local.sentence_count, settings.summarizer.local.sentence_order
            )),
        },
        BackendKind::Hosted => {
            let hosted = &settings.summarizer.hosted;
            let has_key = std::env::var(&hosted.api_key_env)
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false);
            BackendStatus {
                backend: "hosted".to_string(),
                ready: has_key,
                detail: Some(if has_key {
                    format!("{} at {}", hosted.model, hosted.endpoint)
                } else {
                    format!("{} is not set", hosted.api_key_env)
                }),
            }
        }
    }
}
