//! Document registry commands
//!
//! Upload, analyze, summarize, sync, list and delete documents. Every
//! command either fully succeeds or leaves the registry untouched.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{CommandError, CommandResult};
use crate::adapters::{FileStore, StorageError};
use crate::analysis::{join_dates, AnalysisError};
use crate::models::{AnalysisReport, Document, SyncReport};
use crate::services::AnalysisService;
use crate::storage::{Database, DocumentRepo};

/// Extracted text of an upload, or `""` when extraction fails
///
/// Invalid filenames are still an error.
pub(crate) fn extract_or_empty(files: &FileStore, filename: &str) -> Result<String, StorageError> {
    files.path_for(filename)?;
    match files.extract_text(filename) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Could not extract text from {}: {}", filename, e);
            Ok(String::new())
        }
    }
}

fn require_document(repo: &DocumentRepo<'_>, id: i64) -> CommandResult<Document> {
    repo.get(id)?.ok_or(CommandError::DocumentNotFound(id))
}

/// Save an uploaded file and register it with its extracted text
pub fn upload_document(
    db: &Database,
    files: &FileStore,
    filename: &str,
    bytes: &[u8],
) -> CommandResult<Document> {
    let replaced = files.exists(filename);
    files.save_upload(filename, bytes)?;
    let content = extract_or_empty(files, filename)?;

    let mut document = Document::new(filename.trim().to_string(), content);
    let repo = DocumentRepo::new(&db.conn);
    match repo.insert(&document) {
        Ok(id) => document.id = id,
        Err(e) => {
            // A replaced file may still back an older record; only a new one is removed
            if !replaced {
                if let Err(cleanup) = files.delete_file(filename) {
                    warn!("Failed to remove {} after insert error: {}", filename, cleanup);
                }
            }
            return Err(e.into());
        }
    }

    info!("Registered upload {} as document {}", document.filename, document.id);
    Ok(document)
}

/// Analyze an uploaded file and store the result as a new record
pub async fn analyze_document(
    db: &Database,
    files: &FileStore,
    service: &AnalysisService,
    filename: &str,
) -> CommandResult<AnalysisReport> {
    info!("Analyzing {}", filename);
    let text = extract_or_empty(files, filename)?;
    record_analysis(db, service, filename.trim(), &text).await
}

/// Analyze already extracted `text` and insert a record for `filename`
pub async fn record_analysis(
    db: &Database,
    service: &AnalysisService,
    filename: &str,
    text: &str,
) -> CommandResult<AnalysisReport> {
    let analysis = service.analyze(text).await?;

    let mut document = Document::new(filename.to_string(), text.to_string());
    document.summary = Some(analysis.summary.text().to_string());
    document.dates = Some(join_dates(&analysis.dates));

    let id = DocumentRepo::new(&db.conn).insert(&document)?;
    info!(
        "Stored analysis of {} as document {} ({} dates)",
        filename,
        id,
        analysis.dates.len()
    );

    Ok(AnalysisReport {
        document_id: id,
        filename: filename.to_string(),
        summary: analysis.summary.text().to_string(),
        summary_fallback: analysis.summary.is_fallback(),
        dates: analysis.dates,
    })
}

/// Regenerate the summary of an existing record from its file
pub async fn generate_summary(
    db: &Database,
    files: &FileStore,
    service: &AnalysisService,
    id: i64,
) -> CommandResult<Document> {
    let repo = DocumentRepo::new(&db.conn);
    let mut document = require_document(&repo, id)?;

    let text = extract_or_empty(files, &document.filename)?;
    let outcome = service.summarize(&text).await?;

    repo.update_summary(id, outcome.text())?;
    document.summary = Some(outcome.text().to_string());

    info!("Summary generated for document {} ({})", id, document.filename);
    Ok(document)
}

/// Delete a record and its file
///
/// The record is removed inside a transaction that is only committed once
/// the file is gone, so a failure leaves both in place.
pub fn delete_document(db: &Database, files: &FileStore, id: i64) -> CommandResult<Document> {
    let tx = db.conn.unchecked_transaction()?;
    let repo = DocumentRepo::new(&tx);
    let document = require_document(&repo, id)?;

    repo.delete(id)?;
    match files.delete_file(&document.filename) {
        Ok(true) => debug!("Removed file {}", document.filename),
        Ok(false) => debug!("File {} was already gone", document.filename),
        // A record with an unusable name has no file to remove
        Err(StorageError::InvalidFilename(name)) => {
            warn!("Document {} has invalid filename {:?}", id, name)
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit()?;

    info!("Deleted document {} ({})", id, document.filename);
    Ok(document)
}

/// Register files in the upload folder that have no record yet
pub fn sync_files(db: &Database, files: &FileStore) -> CommandResult<SyncReport> {
    let on_disk = files.list_files()?;

    let tx = db.conn.unchecked_transaction()?;
    let repo = DocumentRepo::new(&tx);
    let known = repo.filenames()?;

    let mut report = SyncReport::default();
    for filename in on_disk {
        if known.contains(&filename) {
            report.already_registered += 1;
            continue;
        }

        let mut document = Document::new(filename.clone(), String::new());
        document.summary = Some(String::new());
        document.dates = Some(String::new());
        repo.insert(&document)?;
        report.added.push(filename);
    }
    tx.commit()?;

    info!(
        "Sync added {} documents ({} already registered)",
        report.added.len(),
        report.already_registered
    );
    Ok(report)
}

/// Registered documents, oldest first
pub fn list_documents(
    db: &Database,
    limit: Option<i64>,
    offset: Option<i64>,
) -> CommandResult<Vec<Document>> {
    let repo = DocumentRepo::new(&db.conn);
    let documents = repo.list(limit.unwrap_or(-1), offset.unwrap_or(0))?;
    Ok(documents)
}

pub fn get_document(db: &Database, id: i64) -> CommandResult<Document> {
    require_document(&DocumentRepo::new(&db.conn), id)
}

/// Files currently in the upload folder
pub fn list_files(files: &FileStore) -> CommandResult<Vec<String>> {
    Ok(files.list_files()?)
}

/// Write the markdown summary file for an analyzed document
pub fn save_summary_file(db: &Database, files: &FileStore, id: i64) -> CommandResult<PathBuf> {
    let document = get_document(db, id)?;
    if !document.is_analyzed() {
        return Err(CommandError::Analysis(AnalysisError::EmptyContent));
    }
    Ok(files.save_summary(&document)?)
}
