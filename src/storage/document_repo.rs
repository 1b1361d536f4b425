//! Document repository for database operations on document records

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;

use super::DatabaseError;
use crate::models::Document;

const COLUMNS: &str =
    "id, title, filename, content, summary, similarity, dates, upload_date, created_at";

/// Repository for Document operations
pub struct DocumentRepo<'a> {
    conn: &'a Connection,
}

impl<'a> DocumentRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a document by id
    pub fn get(&self, id: i64) -> Result<Option<Document>, DatabaseError> {
        let sql = format!("SELECT {} FROM documents WHERE id = ?", COLUMNS);
        let document = self
            .conn
            .query_row(&sql, [id], row_to_document)
            .optional()?;
        Ok(document)
    }

    /// Most recent record for a filename
    pub fn find_by_filename(&self, filename: &str) -> Result<Option<Document>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM documents WHERE filename = ? ORDER BY id DESC LIMIT 1",
            COLUMNS
        );
        let document = self
            .conn
            .query_row(&sql, [filename], row_to_document)
            .optional()?;
        Ok(document)
    }

    /// List documents, oldest first
    pub fn list(&self, limit: i64, offset: i64) -> Result<Vec<Document>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM documents ORDER BY id ASC LIMIT ? OFFSET ?",
            COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit, offset], row_to_document)?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    /// Every document, oldest first
    pub fn all(&self) -> Result<Vec<Document>, DatabaseError> {
        self.list(-1, 0)
    }

    /// Insert a new document and return its id
    pub fn insert(&self, document: &Document) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO documents (
                title, filename, content, summary, similarity, dates, upload_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                document.title,
                document.filename,
                document.content,
                document.summary,
                document.similarity,
                document.dates,
                document.upload_date.to_rfc3339(),
                document.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update every mutable column of an existing document
    pub fn update(&self, document: &Document) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE documents SET
                title = ?, filename = ?, content = ?, summary = ?, similarity = ?,
                dates = ?, updated_at = datetime('now')
            WHERE id = ?",
            params![
                document.title,
                document.filename,
                document.content,
                document.summary,
                document.similarity,
                document.dates,
                document.id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Replace only the summary
    pub fn update_summary(&self, id: i64, summary: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE documents SET summary = ?, updated_at = datetime('now') WHERE id = ?",
            params![summary, id],
        )?;
        Ok(changed > 0)
    }

    /// Replace only the similarity percentage
    pub fn update_similarity(&self, id: i64, similarity: f64) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE documents SET similarity = ?, updated_at = datetime('now') WHERE id = ?",
            params![similarity, id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a document by id; `Ok(false)` when there was no such row
    pub fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute("DELETE FROM documents WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    /// Filenames that have at least one record
    pub fn filenames(&self) -> Result<HashSet<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT filename FROM documents")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut names = HashSet::new();
        for row in rows {
            names.insert(row?);
        }
        Ok(names)
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn parse_timestamp(value: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&value)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_document(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get("id")?,
        title: row.get("title")?,
        filename: row.get("filename")?,
        content: row.get("content")?,
        summary: row.get("summary")?,
        similarity: row.get("similarity")?,
        dates: row.get("dates")?,
        upload_date: parse_timestamp(row.get("upload_date")?),
        created_at: parse_timestamp(row.get("created_at")?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::open_in_memory;

    #[test]
    fn test_insert_and_get() {
        let db = open_in_memory().unwrap();
        let repo = DocumentRepo::new(&db.conn);

        let mut doc = Document::new("a.pdf".to_string(), "Body text".to_string());
        doc.summary = Some("Summary".to_string());
        doc.dates = Some("01-12-2024".to_string());
        let id = repo.insert(&doc).unwrap();

        let loaded = repo.get(id).unwrap().unwrap();
        assert_eq!(loaded.id, id);
        assert_eq!(loaded.filename, "a.pdf");
        assert_eq!(loaded.content, "Body text");
        assert_eq!(loaded.summary.as_deref(), Some("Summary"));
        assert_eq!(loaded.dates.as_deref(), Some("01-12-2024"));
        assert_eq!(loaded.similarity, None);
        assert_eq!(loaded.upload_date.timestamp(), doc.upload_date.timestamp());
    }

    #[test]
    fn test_get_missing() {
        let db = open_in_memory().unwrap();
        let repo = DocumentRepo::new(&db.conn);
        assert!(repo.get(42).unwrap().is_none());
    }

    #[test]
    fn test_updates() {
        let db = open_in_memory().unwrap();
        let repo = DocumentRepo::new(&db.conn);
        let id = repo
            .insert(&Document::new("a.pdf".to_string(), String::new()))
            .unwrap();

        assert!(repo.update_summary(id, "New summary").unwrap());
        assert!(repo.update_similarity(id, 42.5).unwrap());
        assert!(!repo.update_summary(id + 1, "nobody").unwrap());

        let mut doc = repo.get(id).unwrap().unwrap();
        assert_eq!(doc.summary.as_deref(), Some("New summary"));
        assert_eq!(doc.similarity, Some(42.5));

        doc.content = "Extracted later".to_string();
        assert!(repo.update(&doc).unwrap());
        assert_eq!(repo.get(id).unwrap().unwrap().content, "Extracted later");
    }

    #[test]
    fn test_list_filenames_and_delete() {
        let db = open_in_memory().unwrap();
        let repo = DocumentRepo::new(&db.conn);

        let first = repo
            .insert(&Document::new("a.pdf".to_string(), String::new()))
            .unwrap();
        repo.insert(&Document::new("b.pdf".to_string(), String::new()))
            .unwrap();
        repo.insert(&Document::new("a.pdf".to_string(), String::new()))
            .unwrap();

        assert_eq!(repo.count().unwrap(), 3);
        assert_eq!(repo.all().unwrap().len(), 3);
        assert_eq!(repo.list(1, 1).unwrap()[0].filename, "b.pdf");

        let names = repo.filenames().unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.pdf") && names.contains("b.pdf"));

        let latest = repo.find_by_filename("a.pdf").unwrap().unwrap();
        assert!(latest.id > first);

        assert!(repo.delete(first).unwrap());
        assert!(!repo.delete(first).unwrap());
        assert_eq!(repo.count().unwrap(), 2);
    }
}
