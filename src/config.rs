//! Application settings
//!
//! Settings live in a JSON file. Every field has a default, so a partial or
//! missing file still yields a usable configuration. Secrets are never
//! stored here; the hosted summarizer reads its key from the environment
//! variable named in `HostedSettings::api_key_env`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::{HighlightMarker, SentenceOrder, DEFAULT_SENTENCE_COUNT};

/// Environment variable pointing at a settings file
pub const CONFIG_ENV: &str = "DOCSIFT_CONFIG";

/// Settings errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("failed to read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write settings {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where loaded settings came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    /// No file at the path; defaults were used
    Defaults(PathBuf),
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsSource::File(path) => write!(f, "settings from {}", path.display()),
            SettingsSource::Defaults(path) => {
                write!(f, "default settings (no file at {})", path.display())
            }
        }
    }
}

/// Which summarizer implementation to use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Hosted,
}

/// Local extractive summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocalSettings {
    pub sentence_count: usize,
    pub sentence_order: SentenceOrder,
    /// Replaces the built-in English stop-word list when set
    pub stop_words: Option<Vec<String>>,
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            sentence_count: DEFAULT_SENTENCE_COUNT,
            sentence_order: SentenceOrder::Document,
            stop_words: None,
        }
    }
}

/// Hosted chat-completions summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostedSettings {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub system_prompt: String,
    /// Prepended to the document text in the user message
    pub prompt: String,
}

impl Default for HostedSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            timeout_secs: 60,
            max_retries: 0,
            api_key_env: "OPENAI_API_KEY".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            prompt: "Summarize the following text:".to_string(),
        }
    }
}

/// Summarizer selection plus per-backend settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SummarizerSettings {
    pub backend: BackendKind,
    pub local: LocalSettings,
    pub hosted: HostedSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Holds the database and the log directory
    pub data_dir: PathBuf,
    pub upload_folder: PathBuf,
    pub summary_folder: PathBuf,
    pub summarizer: SummarizerSettings,
    /// Stored as the summary when the hosted backend fails
    pub fallback_summary: String,
    pub highlight: HighlightMarker,
}

impl Default for AppSettings {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("docsift"))
            .unwrap_or_else(|| PathBuf::from(".docsift"));

        Self {
            upload_folder: data_dir.join("uploads"),
            summary_folder: data_dir.join("summaries"),
            data_dir,
            summarizer: SummarizerSettings::default(),
            fallback_summary: "Summary unavailable.".to_string(),
            highlight: HighlightMarker::default(),
        }
    }
}

impl AppSettings {
    /// SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("docsift.sqlite")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Default settings file: `<config dir>/docsift/settings.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("docsift")
            .join("settings.json"))
    }

    /// Settings file to use: explicit path, then `DOCSIFT_CONFIG`, then the default
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Self::default_path()
    }

    /// Load settings from `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_source(path).map(|(settings, _)| settings)
    }

    /// Like `load`, also reporting whether the file existed
    ///
    /// Nothing is logged here; this runs before the log directory is known.
    pub fn load_with_source(path: &Path) -> Result<(Self, SettingsSource), ConfigError> {
        if !path.exists() {
            return Ok((Self::default(), SettingsSource::Defaults(path.to_path_buf())));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = serde_json::from_str(&content)?;
        Ok((settings, SettingsSource::File(path.to_path_buf())))
    }

    /// Write settings to `path` as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"summarizer": {"backend": "hosted", "local": {"sentence_count": 3}}}"#,
        )
        .unwrap();

        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.summarizer.backend, BackendKind::Hosted);
        assert_eq!(settings.summarizer.local.sentence_count, 3);
        assert_eq!(settings.summarizer.local.sentence_order, SentenceOrder::Document);
        assert_eq!(settings.summarizer.hosted.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.fallback_summary, "Summary unavailable.");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = AppSettings::default();
        settings.data_dir = dir.path().to_path_buf();
        settings.summarizer.local.sentence_order = SentenceOrder::Score;
        settings.save(&path).unwrap();

        let loaded = AppSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_reports_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let (_, source) = AppSettings::load_with_source(&path).unwrap();
        assert_eq!(source, SettingsSource::Defaults(path.clone()));
        assert!(source.to_string().starts_with("default settings"));

        AppSettings::default().save(&path).unwrap();
        let (_, source) = AppSettings::load_with_source(&path).unwrap();
        assert_eq!(source, SettingsSource::File(path));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppSettings::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = AppSettings::resolve_path(Some(Path::new("/tmp/x.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.json"));
    }
}
