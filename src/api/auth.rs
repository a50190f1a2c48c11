//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest, User},
};

use super::{ApiResponse, LoginEnvelope, UserEnvelope, ValidateEnvelope};

/// Login response payload
#[derive(Serialize, ToSchema)]
pub struct LoginData {
    /// Signed bearer token
    pub token: String,
}

/// Credential check response payload
#[derive(Serialize, ToSchema)]
pub struct ValidateData {
    pub username: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation errors"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.services.users.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("User created successfully", user)),
    ))
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginEnvelope),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginData>>> {
    request.validate()?;

    let (token, _user) = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(ApiResponse::ok("Login successful", LoginData { token })))
}

/// Check credentials without issuing a token
#[utoipa::path(
    post,
    path = "/auth/validate",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Valid credentials", body = ValidateEnvelope),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn validate(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<ValidateData>>> {
    request.validate()?;

    state
        .services
        .users
        .validate_credentials(&request.username, &request.password)
        .await?;

    Ok(Json(ApiResponse::ok(
        "Valid Credentials",
        ValidateData {
            username: request.username,
        },
    )))
}
