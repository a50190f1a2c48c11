//! User management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        loan::Loan,
        request::BookRequest,
        user::{Role, UpdateUser, User},
    },
};

use super::{
    ApiResponse, AuthenticatedUser, LoanListEnvelope, RequestListEnvelope, UserEnvelope,
    UserListEnvelope,
};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = UserListEnvelope),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    claims.require_role(&[Role::Admin])?;

    let users = state.services.users.get_all().await?;
    Ok(Json(ApiResponse::ok("Users retrieved successfully", users)))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserEnvelope),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_role(&[Role::Admin])?;

    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("User retrieved successfully", user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.users.update(id, update).await?;
    Ok(Json(ApiResponse::ok("User updated successfully", updated)))
}

/// Soft delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = UserEnvelope),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already deleted")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.users.delete(id).await?;
    Ok(Json(ApiResponse::ok("User Deleted", deleted)))
}

/// Get loans for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's loans", body = LoanListEnvelope),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let loans = state.services.loans.get_user_loans(id).await?;
    Ok(Json(ApiResponse::ok("User Loans Found", loans)))
}

/// Get book requests for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/requests",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User's book requests", body = RequestListEnvelope),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<BookRequest>>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let requests = state.services.requests.get_user_requests(id).await?;
    Ok(Json(ApiResponse::ok("User Requests Found", requests)))
}
