use serde::Serialize;

use crate::analysis::{ExtractedDate, HighlightedPair};

/// Result of analyzing one document
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisReport {
    pub document_id: i64,
    pub filename: String,
    pub summary: String,
    /// The summary is the configured placeholder because the backend failed
    pub summary_fallback: bool,
    pub dates: Vec<ExtractedDate>,
}

/// Result of comparing two uploads
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonReport {
    pub file1: String,
    pub file2: String,
    pub similarity: f64,
    pub highlighted: HighlightedPair,
}

/// Outcome of syncing the upload folder into the registry
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub already_registered: usize,
}

/// Which summarizer is active and whether it can run
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BackendStatus {
    pub backend: String,
    pub ready: bool,
    pub detail: Option<String>,
}
