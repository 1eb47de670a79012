//! Error types for storage operations

use thiserror::Error;

/// Error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The engine could not be reached or the namespace/database selected
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// A multi-statement transaction was rolled back
    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A unique index or record id is already taken
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Internal(err.to_string())
    }
}

impl From<StorageError> for crate::GoalpostError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => crate::GoalpostError::NotFound(msg),
            StorageError::AlreadyExists(msg) => crate::GoalpostError::Conflict(msg),
            StorageError::Validation(msg) => crate::GoalpostError::Validation(msg),
            StorageError::Configuration(msg) => crate::GoalpostError::Configuration(msg),
            other => crate::GoalpostError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GoalpostError;

    #[test]
    fn duplicates_become_conflicts() {
        let err: GoalpostError = StorageError::AlreadyExists("pair".to_string()).into();
        assert!(matches!(err, GoalpostError::Conflict(msg) if msg == "pair"));
    }

    #[test]
    fn engine_failures_stay_opaque() {
        let err: GoalpostError = StorageError::Transaction("rolled back".to_string()).into();
        match err {
            GoalpostError::Storage(msg) => assert_eq!(msg, "Transaction error: rolled back"),
            other => panic!("unexpected {:?}", other),
        }

        let err: GoalpostError = StorageError::NotFound("user".to_string()).into();
        assert!(matches!(err, GoalpostError::NotFound(_)));
    }
}
