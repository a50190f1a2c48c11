//! Loan management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        loan::{CreateLoan, Loan, ReturnLoan, UpdateLoan},
        user::Role,
    },
};

use super::{ApiResponse, AuthenticatedUser, LoanEnvelope, LoanListEnvelope};

/// List all loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of loans", body = LoanListEnvelope),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<Loan>>>> {
    claims.require_role(&[Role::Admin])?;

    let loans = state.services.loans.get_all().await?;
    Ok(Json(ApiResponse::ok("Loans retrieved successfully", loans)))
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanEnvelope),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    claims.require_role(&[Role::User, Role::Admin])?;

    let loan = state.services.loans.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok("Loan retrieved successfully", loan)))
}

/// Create a loan directly, outside the request approval flow
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = LoanEnvelope),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(loan): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<ApiResponse<Loan>>)> {
    claims.require_role(&[Role::Admin])?;

    let created = state.services.loans.create(loan).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Loan created successfully", created)),
    ))
}

/// Update loan dates
#[utoipa::path(
    put,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = LoanEnvelope),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(loan): Json<UpdateLoan>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    claims.require_role(&[Role::Admin])?;

    let updated = state.services.loans.update(id, loan).await?;
    Ok(Json(ApiResponse::ok("Loan updated successfully", updated)))
}

/// Soft delete a loan
#[utoipa::path(
    delete,
    path = "/loans/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan deleted", body = LoanEnvelope),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already deleted")
    )
)]
pub async fn delete_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    claims.require_role(&[Role::Admin])?;

    let deleted = state.services.loans.delete(id).await?;
    Ok(Json(ApiResponse::ok("Loan deleted successfully", deleted)))
}

/// Return a borrowed book.
///
/// The response carries the closed loan, including the computed `late_fee`.
#[utoipa::path(
    put,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = ReturnLoan,
    responses(
        (status = 200, description = "Book returned", body = LoanEnvelope),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(body): Json<ReturnLoan>,
) -> AppResult<Json<ApiResponse<Loan>>> {
    claims.require_role(&[Role::Admin])?;

    let loan = state.services.loans.return_loan(id, body.return_date).await?;
    Ok(Json(ApiResponse::ok("Book returned successfully", loan)))
}
