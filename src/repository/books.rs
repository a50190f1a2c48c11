//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, CreateBook, UpdateBook},
};

const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, a.name AS author_name,
           b.publisher_id, p.name AS publisher_name,
           b.summary, b.stock, b.max_stock, b.created_at, b.updated_at
    FROM books b
    JOIN authors a ON b.author_id = a.id
    JOIN publishers p ON b.publisher_id = p.id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID with author and publisher names
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        let query = format!("{} WHERE b.id = $1 AND b.deleted_at IS NULL", DETAILS_SELECT);
        sqlx::query_as::<_, BookDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List all active books with author and publisher names
    pub async fn get_all(&self) -> AppResult<Vec<BookDetails>> {
        let query = format!("{} WHERE b.deleted_at IS NULL ORDER BY b.id", DETAILS_SELECT);
        let books = sqlx::query_as::<_, BookDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get the plain book row
    pub async fn get_record(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, publisher_id, summary, stock, max_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .bind(&book.summary)
        .bind(book.stock)
        .bind(book.max_stock)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Partially update a book
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author_id = COALESCE($3, author_id),
                publisher_id = COALESCE($4, publisher_id),
                summary = COALESCE($5, summary),
                stock = COALESCE($6, stock),
                max_stock = COALESCE($7, max_stock),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .bind(&book.summary)
        .bind(book.stock)
        .bind(book.max_stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Soft delete a book
    pub async fn soft_delete(&self, id: i32) -> AppResult<Book> {
        let existing = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if existing.deleted_at.is_some() {
            return Err(AppError::AlreadyDeleted("Book".to_string()));
        }

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AlreadyDeleted("Book".to_string()))
    }

    /// Check if an active book exists
    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check whether a title is already used by another active book
    pub async fn title_exists(&self, title: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND id != $2 AND deleted_at IS NULL)",
            )
            .bind(title)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM books WHERE title = $1 AND deleted_at IS NULL)",
            )
            .bind(title)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(exists)
    }

    /// Check whether the book has copies available for lending
    pub async fn has_stock(&self, id: i32) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT stock > 0 FROM books WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
