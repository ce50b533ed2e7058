//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookShort},
        instance::BookInstance,
        lookup::{Genre, Language},
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get book by ID with author, language, genres and instances loaded
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.author = sqlx::query_as("SELECT * FROM authors WHERE id = $1")
            .bind(book.author_id)
            .fetch_optional(&self.pool)
            .await?;

        book.language = sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE id = $1")
            .bind(book.language_id)
            .fetch_optional(&self.pool)
            .await?;

        book.genres = self.get_book_genres(id).await?;

        book.instances = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE book_id = $1 ORDER BY imprint",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(book)
    }

    /// Load all genres for a book via the book_genres junction table
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// List books ordered by title, paginated, optionally filtered by a
    /// case-insensitive title substring
    pub async fn list(
        &self,
        title: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> AppResult<Vec<BookShort>> {
        let books = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT b.id, b.title, b.author_id,
                   a.last_name || ', ' || a.first_name AS author_name
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE ($1::text IS NULL OR b.title ILIKE '%' || $1 || '%')
            ORDER BY b.title
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(title)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books whose title contains the given substring, case-insensitive
    pub async fn count_title_contains(&self, needle: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE title ILIKE '%' || $1 || '%'")
                .bind(needle)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a new book with its genre set
    pub async fn create(
        &self,
        title: &str,
        summary: Option<&str>,
        isbn: Option<&str>,
        author_id: i32,
        language_id: Option<i32>,
        genre_ids: &[i32],
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, summary, isbn, author_id, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(summary)
        .bind(isbn)
        .bind(author_id)
        .bind(language_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_by_id(book_id).await
    }

    /// Update an existing book. Absent fields keep their current value;
    /// a present genre set replaces the previous one.
    pub async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        summary: Option<&str>,
        isbn: Option<&str>,
        author_id: Option<i32>,
        language_id: Option<i32>,
        genre_ids: Option<&[i32]>,
    ) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                summary = COALESCE($3, summary),
                isbn = COALESCE($4, isbn),
                author_id = COALESCE($5, author_id),
                language_id = COALESCE($6, language_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(summary)
        .bind(isbn)
        .bind(author_id)
        .bind(language_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        if let Some(genre_ids) = genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Delete a book. Instances go with it per the schema's cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
