//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book model from database.
///
/// `stock` is the number of copies currently available for lending and stays
/// within `[0, max_stock]`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
    pub summary: String,
    pub stock: i32,
    pub max_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Book with denormalized author and publisher names for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: String,
    pub publisher_id: i32,
    pub publisher_name: String,
    pub summary: String,
    pub stock: i32,
    pub max_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub author_id: i32,
    pub publisher_id: i32,
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
    #[validate(range(min = 0, message = "Max stock cannot be negative"))]
    pub max_stock: i32,
}

/// Update book request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub author_id: Option<i32>,
    pub publisher_id: Option<i32>,
    #[validate(length(min = 1, message = "Summary cannot be empty"))]
    pub summary: Option<String>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    #[validate(range(min = 0, message = "Max stock cannot be negative"))]
    pub max_stock: Option<i32>,
}
