//! Book instance (loanable copy) model and the renewal form.
//!
//! Instances are the physical copies a loan attaches to. Persistence (DB)
//! stores the status as its single-char code; conversions are provided
//! for the typed enum.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::Borrower;

/// Loan status of a copy. DB stores the single-char code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum InstanceStatus {
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl InstanceStatus {
    /// Return the stored char code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            InstanceStatus::Maintenance => "m",
            InstanceStatus::OnLoan => "o",
            InstanceStatus::Available => "a",
            InstanceStatus::Reserved => "r",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::OnLoan => "On loan",
            InstanceStatus::Available => "Available",
            InstanceStatus::Reserved => "Reserved",
        }
    }
}

impl Default for InstanceStatus {
    fn default() -> Self {
        InstanceStatus::Maintenance
    }
}

impl std::str::FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(InstanceStatus::Maintenance),
            "o" => Ok(InstanceStatus::OnLoan),
            "a" => Ok(InstanceStatus::Available),
            "r" => Ok(InstanceStatus::Reserved),
            _ => Err(format!("Invalid instance status code: {}", s)),
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// SQLx conversion for InstanceStatus
impl sqlx::Type<Postgres> for InstanceStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for InstanceStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for InstanceStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_code().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book instance model from database.
/// Invariant (also enforced by a table CHECK): an available copy carries
/// neither a due date nor a borrower.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: Option<String>,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl BookInstance {
    /// True when the due date has passed for a copy still on loan
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InstanceStatus::OnLoan
            && self.due_back.map(|d| d < today).unwrap_or(false)
    }
}

/// Loan with book and borrower details for the loan listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: Uuid,
    pub book_id: i32,
    pub title: String,
    pub imprint: Option<String>,
    pub due_back: Option<NaiveDate>,
    pub borrower: Option<Borrower>,
    pub is_overdue: bool,
}

/// Renewal form payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenewalForm {
    pub renewal_date: NaiveDate,
}

impl RenewalForm {
    /// Validate the requested renewal date against the loan policy window.
    /// Mirrors the field cleaning the librarian form has always done:
    /// not in the past, at most `max_weeks` ahead of today.
    pub fn clean_renewal_date(&self, today: NaiveDate, max_weeks: i64) -> Result<NaiveDate, String> {
        if self.renewal_date < today {
            return Err("Invalid date - renewal in past".to_string());
        }
        if self.renewal_date > today + Duration::weeks(max_weeks) {
            return Err(format!(
                "Invalid date - renewal more than {} weeks ahead",
                max_weeks
            ));
        }
        Ok(self.renewal_date)
    }
}

/// Field-level validation message attached to a redisplayed form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(date: NaiveDate) -> RenewalForm {
        RenewalForm { renewal_date: date }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn status_codes_round_trip() {
        for code in ["m", "o", "a", "r"] {
            let status: InstanceStatus = code.parse().unwrap();
            assert_eq!(status.as_code(), code);
        }
        assert!("x".parse::<InstanceStatus>().is_err());
    }

    #[test]
    fn renewal_in_past_is_rejected() {
        let yesterday = today() - Duration::days(1);
        let err = form(yesterday).clean_renewal_date(today(), 4).unwrap_err();
        assert_eq!(err, "Invalid date - renewal in past");
    }

    #[test]
    fn renewal_today_is_accepted() {
        assert_eq!(form(today()).clean_renewal_date(today(), 4), Ok(today()));
    }

    #[test]
    fn renewal_at_upper_bound_is_accepted() {
        let max = today() + Duration::weeks(4);
        assert_eq!(form(max).clean_renewal_date(today(), 4), Ok(max));
    }

    #[test]
    fn renewal_past_upper_bound_is_rejected() {
        let too_far = today() + Duration::weeks(4) + Duration::days(1);
        let err = form(too_far).clean_renewal_date(today(), 4).unwrap_err();
        assert_eq!(err, "Invalid date - renewal more than 4 weeks ahead");
    }

    #[test]
    fn overdue_requires_on_loan_status() {
        let instance = BookInstance {
            id: Uuid::nil(),
            book_id: 1,
            imprint: None,
            status: InstanceStatus::Available,
            due_back: None,
            borrower_id: None,
        };
        assert!(!instance.is_overdue(today()));

        let overdue = BookInstance {
            status: InstanceStatus::OnLoan,
            due_back: Some(today() - Duration::days(3)),
            borrower_id: Some(7),
            ..instance
        };
        assert!(overdue.is_overdue(today()));
    }
}
