//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod instances;
pub mod lookups;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub instances: instances::InstancesRepository,
    pub lookups: lookups::LookupsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            instances: instances::InstancesRepository::new(pool.clone()),
            lookups: lookups::LookupsRepository::new(pool.clone()),
            pool,
        }
    }
}
