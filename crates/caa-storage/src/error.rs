//! Storage error types for caa-storage.
//!
//! [`StorageError`] covers the failure modes of both backends: database and
//! migration failures, serialization, missing records, references that block
//! a delete, and integrity violations such as duplicate keys.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite driver reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("person not found: {0}")]
    PersonNotFound(i64),

    #[error("exercise not found: {0}")]
    ExerciseNotFound(i64),

    #[error("program not found: {0}")]
    ProgramNotFound(i64),

    /// A record cannot be deleted while others still reference it.
    #[error("{entity} {id} is still in use")]
    InUse { entity: &'static str, id: i64 },

    /// A data integrity violation was detected (duplicate key, bad row).
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
