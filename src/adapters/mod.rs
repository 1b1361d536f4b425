//! External service adapters
//!
//! - Filesystem: upload and summary folders, PDF text extraction
//! - OpenAI: hosted chat-completions summarizer

pub mod filesystem;
pub mod openai;

// Re-export commonly used types
pub use filesystem::{FileStore, StorageError};
pub use openai::HostedBackend;
