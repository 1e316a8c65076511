use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Failures of the durable store
#[derive(Debug, Error)]
pub enum StorageError {
    /// The operation did not complete before its deadline
    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store cannot currently serve requests (e.g. connection loss)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying database driver error
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failed
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be decoded into a record
    #[error("corrupt log record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl StorageError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
            || matches!(self, Self::Database(sqlx::Error::PoolTimedOut))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => Self::Unavailable("connection pool closed".to_string()),
            sqlx::Error::Io(e) => Self::Unavailable(e.to_string()),
            other => Self::Database(other),
        }
    }
}

/// Errors surfaced by the log, query and alert services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("validation error: {0}")]
    Validation(String),

    /// The store failed; never retried at this layer
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_timeout())
    }
}

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Request failed validation
    ValidationError(String),
    /// Durable store failed (including timeouts)
    StorageFailure(String),
    /// Configuration error
    ConfigError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::StorageFailure(msg) => write!(f, "Database error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::ValidationError(_) => "validation_error",
        AppError::StorageFailure(_) => "storage_failure",
        AppError::ConfigError(_) => "config_error",
        AppError::InternalError(_) => "internal_error",
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::ValidationError(msg),
            ServiceError::Storage(e) => Self::StorageFailure(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}
