// ==========================================
// Exam Center - Repository error types
// ==========================================
// Tooling: thiserror derive
// ==========================================

use crate::engine::placement::PlacementError;
use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database errors =====
    #[error("record not found: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("database lock failed: {0}")]
    LockError(String),

    /// BEGIN / COMMIT failures
    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    // ===== Business rules =====
    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    #[error("hall {hall_id} is already used by department {department_id} in session {session_id}")]
    HallOccupied {
        session_id: String,
        hall_id: String,
        department_id: String,
    },

    // ===== Data quality =====
    #[error("validation failed: {0}")]
    ValidationError(String),
}

impl RepositoryError {
    /// Wrap a failed BEGIN or COMMIT
    pub(crate) fn transaction(err: rusqlite::Error) -> Self {
        RepositoryError::DatabaseTransactionError(err.to_string())
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// save() guard failures surface through the store's error type
impl From<PlacementError> for RepositoryError {
    fn from(err: PlacementError) -> Self {
        RepositoryError::BusinessRuleViolation(err.to_string())
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
