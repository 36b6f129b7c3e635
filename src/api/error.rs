// ==========================================
// Exam Center - API layer errors
// ==========================================
// Responsibility: turn repository / engine errors into caller-facing
// errors; every message carries an explicit reason
// ==========================================

use crate::engine::placement::PlacementError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // Placement preconditions
    // ==========================================
    #[error("placement not possible: {0}")]
    PlacementUnavailable(PlacementError),

    #[error("hall {hall_id} is already used by department {department_id} in session {session_id}")]
    HallOccupied {
        session_id: String,
        hall_id: String,
        department_id: String,
    },

    #[error("exam {0} is not active")]
    ExamInactive(String),

    // ==========================================
    // Business rules
    // ==========================================
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // Data access
    // ==========================================
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("validation failed: {0}")]
    ValidationError(String),

    // ==========================================
    // Generic
    // ==========================================
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("database lock failed: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("unique constraint: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("foreign key: {}", msg))
            }
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::HallOccupied {
                session_id,
                hall_id,
                department_id,
            } => ApiError::HallOccupied {
                session_id,
                hall_id,
                department_id,
            },
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
        }
    }
}

impl From<PlacementError> for ApiError {
    fn from(err: PlacementError) -> Self {
        ApiError::PlacementUnavailable(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Reject blank identifiers
pub fn require_id(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}
