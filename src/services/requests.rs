//! Book request lifecycle service

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::request::{BookRequest, CreateBookRequest, UpdateBookRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    config: LoansConfig,
}

impl RequestsService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Create a request in PROCESSING state. The book must exist with stock
    /// available, and the username must belong to the requesting user.
    pub async fn create(&self, request: CreateBookRequest) -> AppResult<BookRequest> {
        request.validate()?;

        if !self.repository.books.has_stock(request.book_id).await? {
            return Err(AppError::OutOfStock);
        }
        if !self.repository.users.exists(request.user_id).await? {
            return Err(AppError::validation("User does not exist", "user_id"));
        }
        if !self
            .repository
            .users
            .username_matches(request.user_id, &request.username)
            .await?
        {
            return Err(AppError::validation(
                "Username does not match the given user",
                "username",
            ));
        }

        self.repository.requests.create(&request).await
    }

    pub async fn get_all(&self) -> AppResult<Vec<BookRequest>> {
        self.repository.requests.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookRequest> {
        self.repository.requests.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, update: UpdateBookRequest) -> AppResult<BookRequest> {
        update.validate()?;

        if let Some(book_id) = update.book_id {
            if !self.repository.books.exists(book_id).await? {
                return Err(AppError::validation("Book does not exist", "book_id"));
            }
        }

        self.repository.requests.update(id, &update).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<BookRequest> {
        self.repository.requests.soft_delete(id).await
    }

    /// Decide a PROCESSING request. Approval decrements stock and opens a
    /// loan due after the configured loan period, returning the due date;
    /// rejection records the mandatory reason and returns `None`.
    pub async fn approve_or_reject(
        &self,
        id: i32,
        approved: bool,
        reason: &str,
    ) -> AppResult<Option<DateTime<Utc>>> {
        if approved {
            let due_date = self
                .repository
                .requests
                .approve(id, self.config.loan_period_days)
                .await?;
            Ok(Some(due_date))
        } else {
            if reason.trim().is_empty() {
                return Err(AppError::validation(
                    "Reason is required when rejecting a request",
                    "reason",
                ));
            }
            self.repository.requests.reject(id, reason).await?;
            Ok(None)
        }
    }

    /// Requests belonging to a user
    pub async fn get_user_requests(&self, user_id: Uuid) -> AppResult<Vec<BookRequest>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.requests.get_by_user_id(user_id).await
    }
}
