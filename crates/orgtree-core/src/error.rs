//! Error types for the orgtree system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrgtreeError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrgtreeResult<T> = Result<T, OrgtreeError>;
