//! docsift: a document registry with PDF text analysis
//!
//! Uploaded PDFs are registered in SQLite and can be summarized, scanned for
//! dates and compared with each other.

pub mod adapters;
pub mod analysis;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use tracing::info;

use adapters::FileStore;
use commands::CommandResult;
use config::AppSettings;
use services::AnalysisService;
use storage::{open_database, Database};

/// Everything a command needs, opened from settings
pub struct AppContext {
    pub settings: AppSettings,
    pub db: Database,
    pub files: FileStore,
    pub analysis: AnalysisService,
}

impl AppContext {
    pub fn from_settings(settings: AppSettings) -> CommandResult<Self> {
        let db = open_database(&settings.database_path())?;
        let files = FileStore::new(&settings.upload_folder, &settings.summary_folder)?;
        let analysis = AnalysisService::from_settings(&settings);

        info!(
            "Opened {:?} with uploads in {:?}",
            db.path, settings.upload_folder
        );
        Ok(Self {
            settings,
            db,
            files,
            analysis,
        })
    }
}
