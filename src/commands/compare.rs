//! Document comparison command

use tracing::{debug, info};

use super::documents::extract_or_empty;
use super::CommandResult;
use crate::adapters::FileStore;
use crate::models::ComparisonReport;
use crate::services::AnalysisService;
use crate::storage::{Database, DocumentRepo};

/// Compare two uploaded files
///
/// A file whose text cannot be extracted compares as empty, which fails
/// with `DocumentEmpty`. When the first file has a record, its similarity
/// column is updated.
pub fn compare_documents(
    db: &Database,
    files: &FileStore,
    service: &AnalysisService,
    file1: &str,
    file2: &str,
) -> CommandResult<ComparisonReport> {
    let text1 = extract_or_empty(files, file1)?;
    let text2 = extract_or_empty(files, file2)?;

    let comparison = service.compare(&text1, &text2)?;
    info!(
        "Similarity of {} and {}: {:.2}%",
        file1, file2, comparison.similarity
    );

    let repo = DocumentRepo::new(&db.conn);
    if let Some(document) = repo.find_by_filename(file1.trim())? {
        repo.update_similarity(document.id, comparison.similarity)?;
        debug!("Recorded similarity on document {}", document.id);
    }

    Ok(ComparisonReport {
        file1: file1.trim().to_string(),
        file2: file2.trim().to_string(),
        similarity: comparison.similarity,
        highlighted: comparison.highlighted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisError, HighlightMarker, LocalBackend};
    use crate::commands::{upload_document, CommandError};
    use crate::storage::open_in_memory;
    use tempfile::tempdir;

    #[test]
    fn test_unreadable_files_compare_as_empty() {
        let dir = tempdir().unwrap();
        let db = open_in_memory().unwrap();
        let files =
            FileStore::new(dir.path().join("uploads"), dir.path().join("summaries")).unwrap();
        let service = AnalysisService::new(
            Box::new(LocalBackend::default()),
            "Summary unavailable.",
            HighlightMarker::default(),
        );

        let document = upload_document(&db, &files, "a.pdf", b"not a pdf").unwrap();
        files.save_upload("b.pdf", b"also not a pdf").unwrap();

        let err = compare_documents(&db, &files, &service, "a.pdf", "b.pdf").unwrap_err();
        assert!(matches!(err, CommandError::Analysis(AnalysisError::DocumentEmpty)));

        let stored = DocumentRepo::new(&db.conn).get(document.id).unwrap().unwrap();
        assert_eq!(stored.similarity, None);
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let dir = tempdir().unwrap();
        let db = open_in_memory().unwrap();
        let files =
            FileStore::new(dir.path().join("uploads"), dir.path().join("summaries")).unwrap();
        let service = AnalysisService::new(
            Box::new(LocalBackend::default()),
            "x",
            HighlightMarker::default(),
        );

        let err = compare_documents(&db, &files, &service, "../a.pdf", "b.pdf").unwrap_err();
        assert!(matches!(err, CommandError::Storage(_)));
    }
}
