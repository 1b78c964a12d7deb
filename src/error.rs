//! Structured error types for store operations and API responses.

use serde::Serialize;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    ValidationError,

    // Not found errors
    TaskNotFound,

    // Internal errors
    InternalError,
}

/// Failure of a task store operation.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Input rejected before any mutation happened.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Task with ID {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(task_id: i64) -> Self {
        Self::NotFound(task_id)
    }

    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound(_) => ErrorCode::TaskNotFound,
            Self::Database(_) | Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// True for failures the caller caused and can correct.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound(_))
    }

    /// Name of the offending field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for TaskError {
    fn from(err: rusqlite::Error) -> Self {
        TaskError::database(err)
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to TaskError first
        match err.downcast::<TaskError>() {
            Ok(task_err) => task_err,
            Err(err) => match err.downcast::<rusqlite::Error>() {
                Ok(sql_err) => TaskError::database(sql_err),
                Err(err) => TaskError::internal(err),
            },
        }
    }
}

/// Wire representation of an error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorBody {
    /// Build the body for an error.
    ///
    /// Internal failures get a generic message; their cause is only copied
    /// into `details` when `expose_details` is set.
    pub fn from_error(err: &TaskError, expose_details: bool) -> Self {
        match err {
            TaskError::Validation { field, message } => Self {
                code: err.code(),
                message: message.clone(),
                details: Some(format!("field: {}", field)),
            },
            TaskError::NotFound(id) => Self {
                code: err.code(),
                message: err.to_string(),
                details: Some(format!("No task found with ID {}", id)),
            },
            TaskError::Database(_) | TaskError::Internal(_) => Self {
                code: err.code(),
                message: "An internal server error occurred".to_string(),
                details: expose_details.then(|| err.to_string()),
            },
        }
    }
}

/// Result type for task operations.
pub type TaskResult<T> = std::result::Result<T, TaskError>;
