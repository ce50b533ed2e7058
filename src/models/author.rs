//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name in "Lastname, Firstname" catalog order
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Create author request. `date_of_death` is pre-filled with a fixed
/// default when omitted.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Author list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AuthorQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Pre-filled `date_of_death` for newly created author records.
pub fn default_date_of_death() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 5, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_lastname_first() {
        let author = Author {
            id: 1,
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert_eq!(author.display_name(), "Le Guin, Ursula");
    }

    #[test]
    fn create_author_rejects_empty_names() {
        let author = CreateAuthor {
            first_name: String::new(),
            last_name: "Borges".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert!(validator::Validate::validate(&author).is_err());
    }
}
