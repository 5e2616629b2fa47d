use serde::{Deserialize, Serialize};

/// Error kinds surfaced to any caller of the core (error-handling design notes).
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    Precondition,
    Validation,
    Unschedulable,
    PartiallyComplete,
    BackendUnavailable,
}

#[derive(Debug, thiserror::Error, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unschedulable: {reason}")]
    Unschedulable { reason: String },

    #[error("partially complete: {committed} of {requested} placements committed")]
    PartiallyComplete { committed: usize, requested: usize },

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound(_) => ErrorCode::NotFound,
            CoreError::Conflict(_) => ErrorCode::Conflict,
            CoreError::Precondition(_) => ErrorCode::Precondition,
            CoreError::Validation(_) => ErrorCode::Validation,
            CoreError::Unschedulable { .. } => ErrorCode::Unschedulable,
            CoreError::PartiallyComplete { .. } => ErrorCode::PartiallyComplete,
            CoreError::BackendUnavailable(_) => ErrorCode::BackendUnavailable,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CoreError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        CoreError::Precondition(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn unschedulable(reason: impl Into<String>) -> Self {
        CoreError::Unschedulable { reason: reason.into() }
    }
}

/// Mirrors the teacher's `ApiError`/`From<sqlx::Error>` classification, extended
/// with the `BackendUnavailable` kind the background loops need.
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::not_found("resource not found"),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                    CoreError::conflict(db_err.message().to_string())
                } else {
                    CoreError::validation(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                CoreError::BackendUnavailable("database temporarily unavailable".into())
            }
            other => CoreError::BackendUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for CoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CoreError::BackendUnavailable(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_sets_code() {
        let err = CoreError::validation("bad input");
        assert_eq!(err.code(), ErrorCode::Validation);
    }

    #[test]
    fn sqlx_row_not_found_maps_to_not_found() {
        let err: CoreError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn error_serializes_with_snake_case_tag() {
        let err = CoreError::conflict("double start");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"conflict\""));
    }
}
