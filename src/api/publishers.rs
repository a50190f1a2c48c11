//! Publisher management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        publisher::{CreatePublisher, Publisher, UpdatePublisher},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, PublisherEnvelope, PublisherListEnvelope};

/// List all publishers
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of publishers", body = PublisherListEnvelope),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_publishers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<Publisher>>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let publishers = state.services.publishers.get_all().await?;
    Ok(Json(ApiResponse::ok(
        "Publishers retrieved successfully",
        publishers,
    )))
}

/// Get publisher by ID
#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher details", body = PublisherEnvelope),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn get_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Publisher>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let publisher = state.services.publishers.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(
        "Publisher retrieved successfully",
        publisher,
    )))
}

/// Create a new publisher
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    security(("bearer_auth" = [])),
    request_body = CreatePublisher,
    responses(
        (status = 201, description = "Publisher created", body = PublisherEnvelope),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(publisher): Json<CreatePublisher>,
) -> AppResult<(StatusCode, Json<ApiResponse<Publisher>>)> {
    claims.require_role(&[Role::Admin])?;

    let created = state.services.publishers.create(publisher).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Publisher created successfully", created)),
    ))
}

/// Update a publisher
#[utoipa::path(
    put,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    request_body = UpdatePublisher,
    responses(
        (status = 200, description = "Publisher updated", body = PublisherEnvelope),
        (status = 404, description = "Publisher not found")
    )
)]
pub async fn update_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(publisher): Json<UpdatePublisher>,
) -> AppResult<Json<ApiResponse<Publisher>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.publishers.update(id, publisher).await?;
    Ok(Json(ApiResponse::ok(
        "Publisher updated successfully",
        updated,
    )))
}

/// Soft delete a publisher
#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "publishers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher deleted", body = PublisherEnvelope),
        (status = 404, description = "Publisher not found"),
        (status = 409, description = "Publisher already deleted")
    )
)]
pub async fn delete_publisher(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Publisher>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.publishers.delete(id).await?;
    Ok(Json(ApiResponse::ok(
        "Publisher deleted successfully",
        deleted,
    )))
}
