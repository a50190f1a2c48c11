//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor, UpdateAuthor},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate()?;
        self.repository.authors.create(&author).await
    }

    pub async fn update(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        author.validate()?;
        self.repository.authors.update(id, &author).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.soft_delete(id).await
    }
}
