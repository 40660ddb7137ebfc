//! # API Errors
//!
//! HTTP-facing error type. Every handler failure funnels into
//! [`ApiError`], which renders as `{"error": "<message>"}` with the
//! mapped status code.
//!
//! ## Status Mapping
//! ```text
//! Validation / conflict / bad payment  → 400
//! Missing or invalid token             → 401
//! Role or ownership denied             → 403
//! Unknown entity                       → 404
//! Storage failure                      → 500 (detail logged, not sent)
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use lodge_core::ValidationError;
use lodge_db::DbError;
use lodge_engine::EngineError;

/// An HTTP-ready error.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match &err {
            EngineError::Validation(_)
            | EngineError::StayConflict
            | EngineError::MissingProfile
            | EngineError::PaymentMethodRequired => ApiError::bad_request(err.to_string()),
            EngineError::NotFound { .. } => ApiError::not_found(err.to_string()),
            EngineError::Forbidden(_) => ApiError::forbidden(err.to_string()),
            EngineError::Store(inner) => {
                error!(error = %inner, "Storage failure behind engine operation");
                ApiError::internal()
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::bad_request(err.to_string()),
            _ => {
                error!(error = %err, "Database failure");
                ApiError::internal()
            }
        }
    }
}
