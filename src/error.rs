//! Error types for the Biblion server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single field-level failure, reported with the offending parameter name.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    pub parameter: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameter: parameter.into(),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<ErrorDetail>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("book out of stock")]
    OutOfStock,

    #[error("loan already returned")]
    AlreadyReturned,

    #[error("{0} is already deleted")]
    AlreadyDeleted(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation error for a single field.
    pub fn validation(message: impl Into<String>, parameter: impl Into<String>) -> Self {
        AppError::Validation(vec![ErrorDetail::new(message, parameter)])
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field));
                    ErrorDetail::new(message, field.to_string())
                })
            })
            .collect();
        AppError::Validation(details)
    }
}

/// Error response envelope
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                "Validation Errors".to_string(),
                details,
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            AppError::OutOfStock => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Book out of stock".to_string(),
                vec![ErrorDetail::new("No copies available", "book_id")],
            ),
            AppError::AlreadyReturned => (
                StatusCode::CONFLICT,
                "Loan already returned".to_string(),
                Vec::new(),
            ),
            AppError::AlreadyDeleted(entity) => (
                StatusCode::CONFLICT,
                format!("{} is already deleted", entity),
                Vec::new(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
                vec![ErrorDetail::new("Invalid password", "password")],
            ),
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            AppError::Authorization(msg) => (StatusCode::FORBIDDEN, msg, Vec::new()),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    Vec::new(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
