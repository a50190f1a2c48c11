//! Publisher management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::publisher::{CreatePublisher, Publisher, UpdatePublisher},
    repository::Repository,
};

#[derive(Clone)]
pub struct PublishersService {
    repository: Repository,
}

impl PublishersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Publisher>> {
        self.repository.publishers.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.get_by_id(id).await
    }

    pub async fn create(&self, publisher: CreatePublisher) -> AppResult<Publisher> {
        publisher.validate()?;
        self.repository.publishers.create(&publisher).await
    }

    pub async fn update(&self, id: i32, publisher: UpdatePublisher) -> AppResult<Publisher> {
        publisher.validate()?;
        self.repository.publishers.update(id, &publisher).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Publisher> {
        self.repository.publishers.soft_delete(id).await
    }
}
