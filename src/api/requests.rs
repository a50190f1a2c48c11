//! Book request lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        request::{ApproveBookRequest, BookRequest, CreateBookRequest, UpdateBookRequest},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, DecisionEnvelope, RequestEnvelope, RequestListEnvelope};

/// Outcome of an approve/reject decision
#[derive(Serialize, ToSchema)]
pub struct DecisionData {
    pub approved: bool,
    /// Due date of the opened loan; absent on rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Create a new book request
#[utoipa::path(
    post,
    path = "/book-requests",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Request created", body = RequestEnvelope),
        (status = 400, description = "Validation errors"),
        (status = 422, description = "Book out of stock")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookRequest>>)> {
    claims.require_role(&[Role::User])?;

    let created = state.services.requests.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Loan request created successfully",
            created,
        )),
    ))
}

/// List all book requests
#[utoipa::path(
    get,
    path = "/book-requests",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of requests", body = RequestListEnvelope),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<BookRequest>>>> {
    claims.require_role(&[Role::Admin])?;

    let requests = state.services.requests.get_all().await?;
    Ok(Json(ApiResponse::ok(
        "Requests retrieved successfully",
        requests,
    )))
}

/// Get book request by ID
#[utoipa::path(
    get,
    path = "/book-requests/{id}",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestEnvelope),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookRequest>>> {
    claims.require_role(&[Role::Admin])?;

    let request = state.services.requests.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("Request retrieved successfully", request)))
}

/// Update a book request (only while PROCESSING)
#[utoipa::path(
    put,
    path = "/book-requests/{id}",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Request updated", body = RequestEnvelope),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved")
    )
)]
pub async fn update_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBookRequest>,
) -> AppResult<Json<ApiResponse<BookRequest>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.requests.update(id, update).await?;
    Ok(Json(ApiResponse::ok("Request updated successfully", updated)))
}

/// Soft delete a book request
#[utoipa::path(
    delete,
    path = "/book-requests/{id}",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request deleted", body = RequestEnvelope),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already deleted")
    )
)]
pub async fn delete_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookRequest>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.requests.delete(id).await?;
    Ok(Json(ApiResponse::ok("Request deleted successfully", deleted)))
}

/// Approve or reject a PROCESSING request.
///
/// Approval opens a loan and returns its due date; rejection requires a
/// non-empty reason.
#[utoipa::path(
    post,
    path = "/book-requests/{id}/approve",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = ApproveBookRequest,
    responses(
        (status = 200, description = "Decision applied", body = DecisionEnvelope),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved"),
        (status = 422, description = "Book out of stock")
    )
)]
pub async fn approve_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(decision): Json<ApproveBookRequest>,
) -> AppResult<Json<ApiResponse<DecisionData>>> {
    claims.require_role(&[Role::Admin])?;

    let due_date = state
        .services
        .requests
        .approve_or_reject(id, decision.approved, &decision.reason)
        .await?;

    let message = if decision.approved {
        "Request approved successfully"
    } else {
        "Request rejected successfully"
    };

    Ok(Json(ApiResponse::ok(
        message,
        DecisionData {
            approved: decision.approved,
            due_date,
        },
    )))
}
