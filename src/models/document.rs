use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered upload and the results of analyzing it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Row id; 0 until the record is inserted
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub filename: String,
    /// Extracted text, empty when extraction has not run or failed
    #[serde(default)]
    pub content: String,
    pub summary: Option<String>,
    /// Percentage from the last comparison this document was first in
    pub similarity: Option<f64>,
    /// Comma-separated `DD-MM-YYYY` dates
    pub dates: Option<String>,
    #[serde(default = "Utc::now")]
    pub upload_date: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// A new, unsaved record titled after its filename
    pub fn new(filename: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title: filename.clone(),
            filename,
            content,
            summary: None,
            similarity: None,
            dates: None,
            upload_date: now,
            created_at: now,
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.summary.as_deref().map(|s| !s.is_empty()).unwrap_or(false)
    }

    /// Parsed `dates` column
    pub fn date_list(&self) -> Vec<String> {
        self.dates
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect()
    }
}
