//! Application commands
//!
//! Each command takes the handles it needs explicitly and returns a
//! serializable result. The CLI in `main.rs` is a thin wrapper over these.

pub mod compare;
pub mod diagnostics;
pub mod documents;
pub mod settings;

use thiserror::Error;

use crate::adapters::StorageError;
use crate::analysis::AnalysisError;
use crate::config::ConfigError;
use crate::storage::DatabaseError;

/// Any failure a command can report
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no document with id {0}")]
    DocumentNotFound(i64),
    #[error("{0}")]
    InvalidInput(String),
}

impl From<rusqlite::Error> for CommandError {
    fn from(e: rusqlite::Error) -> Self {
        CommandError::Database(DatabaseError::QueryFailed(e))
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

pub use compare::compare_documents;
pub use diagnostics::{run_diagnostics, DiagnosticResult};
pub use documents::{
    analyze_document, delete_document, generate_summary, get_document, list_documents,
    list_files, record_analysis, save_summary_file, sync_files, upload_document,
};
pub use settings::{get_settings, init_settings, save_settings};
