//! Loan listings and the renewal workflow

use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    config::LoansConfig,
    error::AppResult,
    models::instance::{BookInstance, FieldError, LoanDetails, RenewalForm},
    repository::Repository,
};

/// Outcome of a renewal submission. Validation failures are recovered
/// locally by redisplaying the form, so they are not an `AppError`.
#[derive(Debug)]
pub enum RenewalOutcome {
    Renewed { due_back: NaiveDate },
    Invalid { errors: Vec<FieldError> },
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// On-loan instances for the given borrower, soonest due first
    pub async fn my_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        self.repository.instances.loans_for_borrower(user_id).await
    }

    /// All on-loan instances, soonest due first
    pub async fn all_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.instances.loans_all().await
    }

    /// Initial renewal form state: the instance plus a proposed date of
    /// today + the configured default offset.
    pub async fn renewal_form(&self, id: Uuid) -> AppResult<(BookInstance, NaiveDate)> {
        let instance = self.repository.instances.get_by_id(id).await?;
        let proposed = Utc::now().date_naive() + Duration::weeks(self.config.renewal_default_weeks);
        Ok((instance, proposed))
    }

    /// Process a renewal submission: validate the date, then move the
    /// instance's due date. Leaves the instance untouched on failure.
    pub async fn renew(&self, id: Uuid, form: &RenewalForm) -> AppResult<RenewalOutcome> {
        // Missing instance is a not-found condition even before validation
        self.repository.instances.get_by_id(id).await?;

        let today = Utc::now().date_naive();
        match form.clean_renewal_date(today, self.config.renewal_max_weeks) {
            Ok(due_back) => {
                self.repository.instances.set_due_back(id, due_back).await?;
                tracing::info!("Renewed instance {} until {}", id, due_back);
                Ok(RenewalOutcome::Renewed { due_back })
            }
            Err(message) => Ok(RenewalOutcome::Invalid {
                errors: vec![FieldError {
                    field: "renewal_date".to_string(),
                    message,
                }],
            }),
        }
    }
}
