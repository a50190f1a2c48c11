//! Repository layer for database operations.
//!
//! Every read in this layer filters soft-deleted rows (`deleted_at IS NULL`);
//! callers never see logically deleted records.

pub mod authors;
pub mod books;
pub mod loans;
pub mod publishers;
pub mod requests;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub publishers: publishers::PublishersRepository,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub requests: requests::RequestsRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            publishers: publishers::PublishersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            pool,
        }
    }
}
