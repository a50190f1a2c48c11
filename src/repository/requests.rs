//! Book requests repository, including the approval workflow.
//!
//! Approval runs as a single transaction: the request row is locked
//! `FOR UPDATE`, the stock decrement is guarded by `stock > 0`, and the
//! loan insert plus status flip commit together or not at all.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::request::{BookRequest, CreateBookRequest, RequestStatus, UpdateBookRequest},
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookRequest> {
        sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book request with id {} not found", id)))
    }

    /// List all active requests
    pub async fn get_all(&self) -> AppResult<Vec<BookRequest>> {
        let requests = sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE deleted_at IS NULL ORDER BY request_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// List active requests for a user
    pub async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<BookRequest>> {
        let requests = sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE user_id = $1 AND deleted_at IS NULL ORDER BY request_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Create a new request in PROCESSING state
    pub async fn create(&self, request: &CreateBookRequest) -> AppResult<BookRequest> {
        let created = sqlx::query_as::<_, BookRequest>(
            r#"
            INSERT INTO book_requests (book_id, user_id, username, request_date, status)
            VALUES ($1, $2, $3, NOW(), $4)
            RETURNING *
            "#,
        )
        .bind(request.book_id)
        .bind(request.user_id)
        .bind(&request.username)
        .bind(RequestStatus::Processing)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Partially update a request; only PROCESSING requests are mutable
    pub async fn update(&self, id: i32, request: &UpdateBookRequest) -> AppResult<BookRequest> {
        let existing = self.get_by_id(id).await?;
        if existing.status != RequestStatus::Processing {
            return Err(AppError::Conflict(format!(
                "Request is already {}",
                existing.status
            )));
        }

        sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests SET
                book_id = COALESCE($2, book_id),
                username = COALESCE($3, username),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.book_id)
        .bind(&request.username)
        .bind(RequestStatus::Processing)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Request is no longer in processing".to_string()))
    }

    /// Soft delete a request
    pub async fn soft_delete(&self, id: i32) -> AppResult<BookRequest> {
        let existing = sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book request with id {} not found", id)))?;

        if existing.deleted_at.is_some() {
            return Err(AppError::AlreadyDeleted("Book request".to_string()));
        }

        sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AlreadyDeleted("Book request".to_string()))
    }

    /// Approve a PROCESSING request: decrement stock, create the loan and
    /// flip the status, all in one transaction. Returns the computed due date.
    pub async fn approve(&self, id: i32, loan_period_days: i64) -> AppResult<DateTime<Utc>> {
        let mut tx = self.pool.begin().await?;

        // Lock the request row so concurrent decisions serialize here.
        let request = sqlx::query_as::<_, BookRequest>(
            "SELECT * FROM book_requests WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book request with id {} not found", id)))?;

        if request.status != RequestStatus::Processing {
            return Err(AppError::Conflict(format!(
                "Request is already {}",
                request.status
            )));
        }

        // Guarded decrement; zero rows affected means no copies left.
        let affected = sqlx::query(
            r#"
            UPDATE books SET stock = stock - 1, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND stock > 0
            "#,
        )
        .bind(request.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            let book_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND deleted_at IS NULL)",
            )
            .bind(request.book_id)
            .fetch_one(&mut *tx)
            .await?;
            if !book_exists {
                return Err(AppError::NotFound(format!(
                    "Book with id {} not found",
                    request.book_id
                )));
            }
            return Err(AppError::OutOfStock);
        }

        let now = Utc::now();
        let due_date = now + Duration::days(loan_period_days);

        sqlx::query(
            r#"
            INSERT INTO loans (book_id, user_id, request_id, loan_date, due_date, return_status)
            VALUES ($1, $2, $3, $4, $5, false)
            "#,
        )
        .bind(request.book_id)
        .bind(request.user_id)
        .bind(request.id)
        .bind(now)
        .bind(due_date)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE book_requests SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(RequestStatus::Approved)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(due_date)
    }

    /// Reject a PROCESSING request, storing the reason. No stock or loan
    /// side effects.
    pub async fn reject(&self, id: i32, reason: &str) -> AppResult<BookRequest> {
        let rejected = sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests SET status = $2, reason = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(RequestStatus::Rejected)
        .bind(reason)
        .bind(RequestStatus::Processing)
        .fetch_optional(&self.pool)
        .await?;

        match rejected {
            Some(request) => Ok(request),
            // Zero rows: either the request is gone or it is already terminal.
            None => {
                let existing = self.get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Request is already {}",
                    existing.status
                )))
            }
        }
    }
}
