//! Book catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookDetails, CreateBook, UpdateBook},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, BookEnvelope, BookListEnvelope, BookRecordEnvelope};

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of books", body = BookListEnvelope),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<BookDetails>>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let books = state.services.books.get_all().await?;
    Ok(Json(ApiResponse::ok("Books retrieved successfully", books)))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookEnvelope),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<BookDetails>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("Book retrieved successfully", book)))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookEnvelope),
        (status = 400, description = "Validation errors"),
        (status = 409, description = "Title already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookDetails>>)> {
    claims.require_role(&[Role::Admin])?;

    let created = state.services.books.create(book).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Book created successfully", created)),
    ))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookEnvelope),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Title already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<ApiResponse<BookDetails>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.books.update(id, book).await?;
    Ok(Json(ApiResponse::ok("Book updated successfully", updated)))
}

/// Soft delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = BookRecordEnvelope),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already deleted")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Book>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.books.delete(id).await?;
    Ok(Json(ApiResponse::ok("Book deleted successfully", deleted)))
}
