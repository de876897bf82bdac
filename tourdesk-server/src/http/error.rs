//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Each response carries its [`ErrorKind`] as an extension so the legacy
//! status layer can remap it without parsing the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Natural key already taken (409)
    Conflict { resource: &'static str, id: String },

    /// Body key differs from the query-string key (400)
    KeyMismatch {
        resource: &'static str,
        path: String,
        body: String,
    },

    /// Database error (500, logged)
    Database(DbError),
}

/// Error category attached to error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    KeyMismatch,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::KeyMismatch => "key_mismatch",
            Self::Internal => "internal_error",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::Validation | Self::KeyMismatch => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status under `--legacy-status`: every lookup failure is a 404.
    pub fn legacy_status(self) -> StatusCode {
        match self {
            Self::NotFound | Self::Conflict | Self::KeyMismatch => StatusCode::NOT_FOUND,
            other => other.status(),
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::KeyMismatch { .. } => ErrorKind::KeyMismatch,
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::NotFound { resource, id } => format!("{} '{}' not found", resource, id),
            Self::Conflict { resource, id } => format!("{} '{}' already exists", resource, id),
            Self::KeyMismatch {
                resource,
                path,
                body,
            } => format!(
                "{} key in body '{}' does not match requested '{}'",
                resource, body, path
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "an internal error occurred".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let body = json!({
            "error": kind.as_str(),
            "message": self.message(),
        });

        let mut response = (kind.status(), Json(body)).into_response();
        response.extensions_mut().insert(kind);
        response
    }
}

/// Response mapper installed when legacy status codes are requested.
pub async fn legacy_status(mut response: Response) -> Response {
    if let Some(kind) = response.extensions().get::<ErrorKind>().copied() {
        *response.status_mut() = kind.legacy_status();
    }
    response
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Conflict { resource, id } => Self::Conflict { resource, id },
            _ => Self::Database(e),
        }
    }
}
