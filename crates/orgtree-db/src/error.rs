//! Database-specific error types and conversions.

use orgtree_core::error::OrgtreeError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for OrgtreeError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => OrgtreeError::NotFound { entity, id },
            DbError::InvalidRecord(msg) => OrgtreeError::Internal(msg),
            other => OrgtreeError::Database(other.to_string()),
        }
    }
}
