//! Catalog record administration service

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{self, Author, CreateAuthor, UpdateAuthor},
        book::{normalize_isbn, Book, BookShort, CreateBook, UpdateBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // Authors
    // =========================================================================

    /// List authors with total count
    pub async fn list_authors(&self, page: i64, per_page: i64) -> AppResult<(Vec<Author>, i64)> {
        let authors = self.repository.authors.list(page, per_page).await?;
        let total = self.repository.authors.count().await?;
        Ok((authors, total))
    }

    /// Get author by ID
    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create an author. An omitted date_of_death gets the catalog's
    /// fixed pre-fill.
    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        let date_of_death = data
            .date_of_death
            .or_else(|| Some(author::default_date_of_death()));
        self.repository
            .authors
            .create(
                &data.first_name,
                &data.last_name,
                data.date_of_birth,
                date_of_death,
            )
            .await
    }

    /// Update an author
    pub async fn update_author(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        self.repository
            .authors
            .update(
                id,
                data.first_name.as_deref(),
                data.last_name.as_deref(),
                data.date_of_birth,
                data.date_of_death,
            )
            .await
    }

    /// Delete an author. Refused while books still reference it.
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.get_by_id(id).await?;

        let books = self.repository.authors.count_books(id).await?;
        if books > 0 {
            return Err(AppError::Conflict(format!(
                "Author has {} book(s); delete or reassign them first",
                books
            )));
        }

        self.repository.authors.delete(id).await
    }

    // =========================================================================
    // Books
    // =========================================================================

    /// List books with total count
    pub async fn list_books(
        &self,
        title: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> AppResult<(Vec<BookShort>, i64)> {
        let books = self.repository.books.list(title, page, per_page).await?;
        let total = self.repository.books.count().await?;
        Ok((books, total))
    }

    /// Get book by ID with relations loaded
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a book. The referenced author must exist.
    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        self.repository.authors.get_by_id(data.author_id).await?;

        let isbn = data.isbn.as_deref().map(normalize_isbn);
        self.repository
            .books
            .create(
                &data.title,
                data.summary.as_deref(),
                isbn.as_deref(),
                data.author_id,
                data.language_id,
                &data.genre_ids,
            )
            .await
    }

    /// Update a book
    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        if let Some(author_id) = data.author_id {
            self.repository.authors.get_by_id(author_id).await?;
        }

        let isbn = data.isbn.as_deref().map(normalize_isbn);
        self.repository
            .books
            .update(
                id,
                data.title.as_deref(),
                data.summary.as_deref(),
                isbn.as_deref(),
                data.author_id,
                data.language_id,
                data.genre_ids.as_deref(),
            )
            .await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// List all genres
    pub async fn list_genres(&self) -> AppResult<Vec<crate::models::lookup::Genre>> {
        self.repository.lookups.list_genres().await
    }

    /// List all languages
    pub async fn list_languages(&self) -> AppResult<Vec<crate::models::lookup::Language>> {
        self.repository.lookups.list_languages().await
    }
}
