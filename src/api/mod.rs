//! API handlers for Biblion REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod publishers;
pub mod requests;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Success response envelope shared by all endpoints
#[derive(Serialize, ToSchema)]
#[aliases(
    AuthorEnvelope = ApiResponse<crate::models::author::Author>,
    AuthorListEnvelope = ApiResponse<Vec<crate::models::author::Author>>,
    PublisherEnvelope = ApiResponse<crate::models::publisher::Publisher>,
    PublisherListEnvelope = ApiResponse<Vec<crate::models::publisher::Publisher>>,
    BookEnvelope = ApiResponse<crate::models::book::BookDetails>,
    BookRecordEnvelope = ApiResponse<crate::models::book::Book>,
    BookListEnvelope = ApiResponse<Vec<crate::models::book::BookDetails>>,
    UserEnvelope = ApiResponse<crate::models::user::User>,
    UserListEnvelope = ApiResponse<Vec<crate::models::user::User>>,
    RequestEnvelope = ApiResponse<crate::models::request::BookRequest>,
    RequestListEnvelope = ApiResponse<Vec<crate::models::request::BookRequest>>,
    LoanEnvelope = ApiResponse<crate::models::loan::Loan>,
    LoanListEnvelope = ApiResponse<Vec<crate::models::loan::Loan>>,
    LoginEnvelope = ApiResponse<auth::LoginData>,
    ValidateEnvelope = ApiResponse<auth::ValidateData>,
    DecisionEnvelope = ApiResponse<requests::DecisionData>
)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Get the Authorization header
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Check for Bearer token
        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        // Validate JWT token using the secret from configuration
        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}
