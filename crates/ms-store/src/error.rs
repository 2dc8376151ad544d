//! Error types for ms-store

use thiserror::Error;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection error (S001)
    #[error("[S001] Store connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (S002)
    #[error("[S002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Primary key, unique, foreign key or check constraint violated (S003)
    #[error("[S003] Constraint violated: {0}")]
    ConstraintViolation(String),

    /// BEGIN / COMMIT / ROLLBACK failed (S004)
    #[error("[S004] Transaction failed: {0}")]
    TransactionError(String),

    /// Column value has no `Value` representation (S005)
    #[error("[S005] Unsupported column value: {0}")]
    UnsupportedValue(String),
}

/// Result type alias for StoreError
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured constraint variants, so
        // the message prefix is the only reliable signal.
        let msg = err.to_string();
        if msg.contains("Constraint Error") || msg.contains("violates primary key") {
            StoreError::ConstraintViolation(msg)
        } else {
            StoreError::ExecutionError(msg)
        }
    }
}
