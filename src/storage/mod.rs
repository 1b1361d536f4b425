//! Storage module for SQLite database operations
//!
//! This module provides:
//! - Database connection management
//! - Schema migrations
//! - The document repository

pub mod db;
pub mod document_repo;

pub use db::{open_database, open_in_memory, Database, DatabaseError};
pub use document_repo::DocumentRepo;
