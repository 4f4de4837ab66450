//! Storage error types shared by the catalog services
//!
//! Every store implementation reports failures through [`DatabaseError`] so
//! handlers can map them to HTTP responses without knowing which backend
//! produced them.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Duplicate value: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist
    #[error("Missing referenced row: {0}")]
    MissingReference(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query failure
    ///
    /// Unique violations become [`DatabaseError::Conflict`] and foreign key
    /// violations become [`DatabaseError::MissingReference`].
    pub fn from_query(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                DatabaseError::Conflict(db.message().to_string())
            }
            SqlxError::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::MissingReference(db.message().to_string())
            }
            _ => DatabaseError::Query(err),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
