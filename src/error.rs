use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use serde_json::Value;

use crate::messages;

/// Application error type that can be returned from handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // 400: field-level validation failures
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    // 400: malformed request (bad id, empty update, rejected upload)
    #[error("{0}")]
    BadRequest(String),

    // 401
    #[error("{0}")]
    Unauthorized(String),

    // 404
    #[error("{0}")]
    NotFound(String),

    // 409
    #[error("{0}")]
    Conflict(String),

    // 500: media host or mail server failure, message is surfaced
    #[error("{0}")]
    Upstream(String),

    // 500: message is logged, never surfaced
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_id() -> Self {
        AppError::BadRequest(messages::INVALID_ID.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error envelope
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    errors: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, errors) = match self {
            AppError::Validation(list) => (messages::VALIDATION_ERROR.to_string(), list.into()),
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => (msg, Value::Null),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (msg, Value::Null)
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (messages::SERVER_ERROR.to_string(), debug_detail(msg))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (messages::SERVER_ERROR.to_string(), debug_detail(msg))
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            errors,
        });

        (status, body).into_response()
    }
}

// Debug builds surface the underlying cause of a 500
fn debug_detail(msg: String) -> Value {
    if cfg!(debug_assertions) {
        Value::String(msg)
    } else {
        Value::Null
    }
}

// Convenient conversions from common error types

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == 11000 => {
                AppError::Conflict(messages::DUPLICATE_ENTRY.to_string())
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<bson::ser::Error> for AppError {
    fn from(err: bson::ser::Error) -> Self {
        AppError::Internal(format!("BSON serialization failed: {}", err))
    }
}

impl From<bson::de::Error> for AppError {
    fn from(err: bson::de::Error) -> Self {
        AppError::Internal(format!("BSON deserialization failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        AppError::Unauthorized(messages::INVALID_TOKEN.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(vec![rejection.body_text()])
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
