//! API Errors

use alerting::AlertError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use control::CommandError;
use serde::{Deserialize, Serialize};
use storage::StorageError;
use thiserror::Error;

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Request Errors
    // ==================
    /// Rule write or control command rejected
    #[error("{0}")]
    Command(#[from] CommandError),

    /// Alert transition rejected
    #[error("{0}")]
    Alert(#[from] AlertError),

    // ==================
    // Startup Errors
    // ==================
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Metrics setup failed: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Command(CommandError::from(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Command(CommandError::Malformed(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Command(CommandError::Malformed(rejection.body_text()))
    }
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Command(err) => match err {
                CommandError::Validation(_)
                | CommandError::UnknownCommand(_)
                | CommandError::Malformed(_) => StatusCode::BAD_REQUEST,
                CommandError::NotFound(_) => StatusCode::NOT_FOUND,
                CommandError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Alert(AlertError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Alert(AlertError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Config(_) | ApiError::Logging(_) | ApiError::Metrics(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
