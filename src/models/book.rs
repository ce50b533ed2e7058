//! Book (catalog entry) model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::author::Author;
use super::instance::BookInstance;
use super::lookup::{Genre, Language};

static ISBN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9 -]+$").unwrap());

/// Field-level ISBN constraint: 13 digits, separators tolerated.
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    if !ISBN_CHARS.is_match(isbn) {
        let mut err = ValidationError::new("isbn");
        err.message = Some("ISBN may only contain digits, spaces and hyphens".into());
        return Err(err);
    }
    let digits = isbn.chars().filter(|c| c.is_ascii_digit()).count();
    if digits != 13 {
        let mut err = ValidationError::new("isbn");
        err.message = Some("ISBN must contain 13 digits".into());
        return Err(err);
    }
    Ok(())
}

/// Strip separators so the stored ISBN is digits only.
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub author_id: i32,
    pub language_id: Option<i32>,
    // Relations (loaded separately)
    #[sqlx(skip)]
    #[serde(default)]
    pub author: Option<Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub language: Option<Language>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[sqlx(skip)]
    #[serde(default)]
    pub instances: Vec<BookInstance>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub author_id: i32,
    pub author_name: Option<String>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: Option<String>,
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    pub author_id: i32,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
}

/// Update book request. The editable subset: title, author, summary,
/// isbn, genre, language.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Summary must be at most 1000 characters"))]
    pub summary: Option<String>,
    #[validate(custom(function = "validate_isbn"))]
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
    pub language_id: Option<i32>,
}

/// Book list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive title substring filter
    pub title: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isbn_accepts_13_digits() {
        assert!(validate_isbn("9780141439600").is_ok());
    }

    #[test]
    fn isbn_accepts_separators() {
        assert!(validate_isbn("978-0-14-143960-0").is_ok());
        assert_eq!(normalize_isbn("978-0-14-143960-0"), "9780141439600");
    }

    #[test]
    fn isbn_rejects_wrong_length() {
        assert!(validate_isbn("0141439600").is_err());
        assert!(validate_isbn("97801414396001").is_err());
    }

    #[test]
    fn isbn_rejects_letters() {
        assert!(validate_isbn("97801414396XX").is_err());
    }
}
