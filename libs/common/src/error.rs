//! Custom error types for the common library
//!
//! `DatabaseError` covers pool setup and migrations, `StoreError` is what
//! repositories return from individual operations.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database setup
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error returned by repository operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("Duplicate key violates constraint {constraint}")]
    DuplicateKey { constraint: String },

    /// Any other storage fault
    #[error("Storage error: {0}")]
    Database(#[source] SqlxError),
}

impl StoreError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateKey {
                    constraint: db_err.constraint().unwrap_or("unique").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_duplicates() {
        let err = StoreError::from(SqlxError::RowNotFound);
        assert!(!err.is_duplicate_key());
        assert!(matches!(err, StoreError::Database(SqlxError::RowNotFound)));
    }

    #[test]
    fn duplicate_key_names_the_constraint() {
        let err = StoreError::DuplicateKey {
            constraint: "products_slug_key".to_string(),
        };
        assert!(err.is_duplicate_key());
        assert_eq!(
            err.to_string(),
            "Duplicate key violates constraint products_slug_key"
        );
    }
}
