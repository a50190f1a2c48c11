//! Business logic services

pub mod authors;
pub mod books;
pub mod loans;
pub mod publishers;
pub mod requests;
pub mod users;

use crate::{
    config::{AuthConfig, LoansConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub publishers: publishers::PublishersService,
    pub books: books::BooksService,
    pub users: users::UsersService,
    pub requests: requests::RequestsService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, loans_config: LoansConfig) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            publishers: publishers::PublishersService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            requests: requests::RequestsService::new(repository.clone(), loans_config.clone()),
            loans: loans::LoansService::new(repository, loans_config),
        }
    }
}
