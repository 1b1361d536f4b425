//! Database connection management and migrations

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Latest schema version this build knows how to apply
pub const SCHEMA_VERSION: i32 = 1;

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),
}

/// Wrapper around SQLite connection
pub struct Database {
    pub conn: Connection,
    pub path: PathBuf,
}

/// Open or create the database at `db_path`, applying pending migrations
pub fn open_database(db_path: &Path) -> Result<Database, DatabaseError> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DatabaseError::ConnectionFailed(format!("Failed to create {:?}: {}", parent, e))
        })?;
    }

    info!("Opening database at {:?}", db_path);

    let conn = Connection::open(db_path)
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    run_migrations(&conn)?;

    Ok(Database {
        conn,
        path: db_path.to_path_buf(),
    })
}

/// Open a private in-memory database with the current schema
pub fn open_in_memory() -> Result<Database, DatabaseError> {
    let conn = Connection::open_in_memory()
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    run_migrations(&conn)?;
    Ok(Database {
        conn,
        path: PathBuf::from(":memory:"),
    })
}

/// Highest applied schema version, 0 for a fresh database
pub fn schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Run database schema migrations
fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = schema_version(conn);
    info!("Current schema version: {}", current_version);

    if current_version < 1 {
        info!("Applying migration v1: Initial schema");
        apply_v1_schema(conn)?;
    }

    Ok(())
}

/// Apply the initial v1 schema
fn apply_v1_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(include_str!("schema.sql"))
        .map_err(|e| DatabaseError::MigrationFailed(format!("Failed to apply v1 schema: {}", e)))?;
    Ok(())
}
