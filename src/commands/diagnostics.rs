//! Diagnostic commands
//!
//! Report the configured summarizer backend and the health of local state.

use serde::Serialize;
use std::fs;
use tracing::info;

use super::CommandResult;
use crate::adapters::FileStore;
use crate::config::AppSettings;
use crate::models::BackendStatus;
use crate::services::backend_status;
use crate::storage::{Database, DocumentRepo};

/// Diagnostic result with system checks
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticResult {
    pub backend: BackendStatus,
    /// Whether the upload folder accepts writes
    pub uploads_writable: bool,
    /// Database connection status
    pub db_status: String,
    pub document_count: i64,
    pub database_path: String,
    pub log_path: String,
    pub app_version: String,
}

/// Run diagnostic checks
pub fn run_diagnostics(
    settings: &AppSettings,
    db: &Database,
    files: &FileStore,
) -> CommandResult<DiagnosticResult> {
    info!("Running diagnostics");

    let marker_file = files.upload_dir().join(".docsift_write_test");
    let uploads_writable = fs::write(&marker_file, "test").is_ok();
    if uploads_writable {
        fs::remove_file(&marker_file).ok();
    }

    let (db_status, document_count) = match DocumentRepo::new(&db.conn).count() {
        Ok(count) => ("Connected".to_string(), count),
        Err(e) => (format!("Error: {}", e), 0),
    };

    Ok(DiagnosticResult {
        backend: backend_status(settings),
        uploads_writable,
        db_status,
        document_count,
        database_path: db.path.to_string_lossy().to_string(),
        log_path: settings.log_dir().to_string_lossy().to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
