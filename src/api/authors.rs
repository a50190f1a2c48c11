//! Author management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, AuthorEnvelope, AuthorListEnvelope};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of authors", body = AuthorListEnvelope),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<Author>>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let authors = state.services.authors.get_all().await?;
    Ok(Json(ApiResponse::ok("Authors retrieved successfully", authors)))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorEnvelope),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Author>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("Author retrieved successfully", author)))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = AuthorEnvelope),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<ApiResponse<Author>>)> {
    claims.require_role(&[Role::Admin])?;

    let created = state.services.authors.create(author).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Author created successfully", created)),
    ))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorEnvelope),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(author): Json<UpdateAuthor>,
) -> AppResult<Json<ApiResponse<Author>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.authors.update(id, author).await?;
    Ok(Json(ApiResponse::ok("Author updated successfully", updated)))
}

/// Soft delete an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = AuthorEnvelope),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author already deleted")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Author>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.authors.delete(id).await?;
    Ok(Json(ApiResponse::ok("Author deleted successfully", deleted)))
}
