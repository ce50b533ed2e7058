//! Home page aggregates

use crate::{
    error::AppResult, models::instance::InstanceStatus, repository::Repository,
};

/// Aggregate counts shown on the catalog home page
#[derive(Debug, Clone)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    pub num_books_the: i64,
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Repository,
}

impl DashboardService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Compute the home page counts
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let num_books = self.repository.books.count().await?;
        let num_instances = self.repository.instances.count().await?;
        let num_instances_available = self
            .repository
            .instances
            .count_by_status(InstanceStatus::Available)
            .await?;
        let num_authors = self.repository.authors.count().await?;
        let num_genres = self.repository.lookups.count_genres().await?;
        let num_books_the = self.repository.books.count_title_contains("the").await?;

        Ok(CatalogCounts {
            num_books,
            num_instances,
            num_instances_available,
            num_authors,
            num_genres,
            num_books_the,
        })
    }
}
