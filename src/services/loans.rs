//! Loan management service

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, UpdateLoan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Loan>> {
        self.repository.loans.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    /// Create a loan directly, outside the request approval flow.
    pub async fn create(&self, loan: CreateLoan) -> AppResult<Loan> {
        loan.validate()?;

        if !self.repository.books.exists(loan.book_id).await? {
            return Err(AppError::validation("Book does not exist", "book_id"));
        }
        if !self.repository.users.exists(loan.user_id).await? {
            return Err(AppError::validation("User does not exist", "user_id"));
        }

        self.repository.loans.create(&loan).await
    }

    pub async fn update(&self, id: i32, loan: UpdateLoan) -> AppResult<Loan> {
        loan.validate()?;
        self.repository.loans.get_by_id(id).await?;
        self.repository.loans.update(id, &loan).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.soft_delete(id).await
    }

    /// Close a loan at `return_date`, charging the configured per-day fee
    /// for overdue days and restoring the book's stock.
    pub async fn return_loan(&self, id: i32, return_date: DateTime<Utc>) -> AppResult<Loan> {
        self.repository
            .loans
            .return_loan(id, return_date, self.config.late_fee_per_day)
            .await
    }

    /// Loans belonging to a user
    pub async fn get_user_loans(&self, user_id: Uuid) -> AppResult<Vec<Loan>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.loans.get_by_user_id(user_id).await
    }
}
