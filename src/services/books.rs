//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDetails, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> AppResult<Vec<BookDetails>> {
        self.repository.books.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, book: CreateBook) -> AppResult<BookDetails> {
        book.validate()?;

        if book.stock > book.max_stock {
            return Err(AppError::validation("Stock cannot exceed max stock", "stock"));
        }
        if !self.repository.authors.exists(book.author_id).await? {
            return Err(AppError::validation("Author does not exist", "author_id"));
        }
        if !self.repository.publishers.exists(book.publisher_id).await? {
            return Err(AppError::validation("Publisher does not exist", "publisher_id"));
        }
        if self.repository.books.title_exists(&book.title, None).await? {
            return Err(AppError::Conflict("Title already exists".to_string()));
        }

        let created = self.repository.books.create(&book).await?;
        self.repository.books.get_by_id(created.id).await
    }

    pub async fn update(&self, id: i32, book: UpdateBook) -> AppResult<BookDetails> {
        book.validate()?;

        let current = self.repository.books.get_record(id).await?;

        if let Some(ref title) = book.title {
            if self.repository.books.title_exists(title, Some(id)).await? {
                return Err(AppError::Conflict("Title already exists".to_string()));
            }
        }
        if let Some(author_id) = book.author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::validation("Author does not exist", "author_id"));
            }
        }
        if let Some(publisher_id) = book.publisher_id {
            if !self.repository.publishers.exists(publisher_id).await? {
                return Err(AppError::validation("Publisher does not exist", "publisher_id"));
            }
        }

        let stock = book.stock.unwrap_or(current.stock);
        let max_stock = book.max_stock.unwrap_or(current.max_stock);
        if stock > max_stock {
            return Err(AppError::validation("Stock cannot exceed max stock", "stock"));
        }

        let updated = self.repository.books.update(id, &book).await?;
        self.repository.books.get_by_id(updated.id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Book> {
        self.repository.books.soft_delete(id).await
    }
}
