//! Services module for business logic
//!
//! Services coordinate the analysis functions with the configured
//! summarizer backend. Commands call into them.

pub mod analysis_service;

pub use analysis_service::{
    backend_status, local_backend, AnalysisService, DocumentAnalysis, DocumentComparison,
    SummaryOutcome,
};
