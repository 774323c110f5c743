use sea_orm::{DbErr, SqlErr};
use thiserror::Error;


#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity} with id {id} does not exist")]
    NotFound {
        entity: &'static str,
        id: i32,
    },
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl EntityError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        EntityError::NotFound { entity, id }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        EntityError::InvalidArgument(message.into())
    }

    /// Maps a unique constraint violation to `Conflict` with the given message.
    /// Every other database error is passed through unchanged.
    pub fn from_db_with_conflict(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => EntityError::Conflict(conflict_message.to_string()),
            _ => EntityError::Database(err),
        }
    }
}

/// Turns the result of a lookup into `NotFound` if the row is missing.
pub fn found<T>(value: Option<T>, entity: &'static str, id: i32) -> Result<T, EntityError> {
    value.ok_or(EntityError::NotFound { entity, id })
}
