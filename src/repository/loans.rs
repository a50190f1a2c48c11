//! Loans repository, including the return workflow.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::loan::{late_fee, CreateLoan, Loan, UpdateLoan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// List all active loans
    pub async fn get_all(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE deleted_at IS NULL ORDER BY loan_date",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// List active loans for a user
    pub async fn get_by_user_id(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE user_id = $1 AND deleted_at IS NULL ORDER BY loan_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Create a new loan
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, user_id, loan_date, due_date, return_status)
            VALUES ($1, $2, $3, $4, false)
            RETURNING *
            "#,
        )
        .bind(loan.book_id)
        .bind(loan.user_id)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Update loan dates
    pub async fn update(&self, id: i32, loan: &UpdateLoan) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET loan_date = $2, due_date = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(loan.loan_date)
        .bind(loan.due_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Soft delete a loan
    pub async fn soft_delete(&self, id: i32) -> AppResult<Loan> {
        let existing = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if existing.deleted_at.is_some() {
            return Err(AppError::AlreadyDeleted("Loan".to_string()));
        }

        sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AlreadyDeleted("Loan".to_string()))
    }

    /// Close a loan: set the return fields, compute the late fee and restore
    /// one copy of stock, all in one transaction. The loan row is locked so
    /// a second concurrent return observes `return_status = true`.
    pub async fn return_loan(
        &self,
        id: i32,
        return_date: DateTime<Utc>,
        fee_per_day: i64,
    ) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            "SELECT * FROM loans WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if loan.return_status {
            return Err(AppError::AlreadyReturned);
        }

        let fee = late_fee(loan.due_date, return_date, fee_per_day);

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET return_status = true, return_date = $2, late_fee = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(return_date)
        .bind(fee)
        .fetch_one(&mut *tx)
        .await?;

        // Inverse of the approval decrement, clamped to max_stock.
        sqlx::query(
            r#"
            UPDATE books SET stock = LEAST(stock + 1, max_stock), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
