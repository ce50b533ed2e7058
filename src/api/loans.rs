//! Loan listing and renewal endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::instance::{BookInstance, FieldError, LoanDetails, RenewalForm},
    services::loans::RenewalOutcome,
};

use super::AuthenticatedUser;

/// Renewal form state: returned on initial display and, with errors
/// attached and the submitted value preserved, on validation failure.
#[derive(Serialize, ToSchema)]
pub struct RenewalFormView {
    /// The copy being renewed
    pub book_instance: BookInstance,
    /// The form's current date value
    pub form: RenewalForm,
    /// Field-level validation messages (empty on initial display)
    pub errors: Vec<FieldError>,
}

/// Renewal success response
#[derive(Serialize, ToSchema)]
pub struct RenewResponse {
    /// Instance ID
    pub id: Uuid,
    /// The new due date
    pub due_back: NaiveDate,
    /// Route to redirect to
    pub redirect: String,
}

/// List the authenticated caller's loans
#[utoipa::path(
    get,
    path = "/loans/my",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's active loans, soonest due first", body = Vec<LoanDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.my_loans(claims.user_id).await?;
    Ok(Json(loans))
}

/// List all borrowers' loans
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All active loans, soonest due first", body = Vec<LoanDetails>),
        (status = 403, description = "Insufficient rights")
    )
)]
pub async fn all_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_mark_returned()?;

    let loans = state.services.loans.all_loans().await?;
    Ok(Json(loans))
}

/// Show the renewal form for a loaned copy
#[utoipa::path(
    get,
    path = "/loans/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Form state with the proposed renewal date", body = RenewalFormView),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalFormView>> {
    claims.require_mark_returned()?;

    let (book_instance, proposed) = state.services.loans.renewal_form(id).await?;

    Ok(Json(RenewalFormView {
        book_instance,
        form: RenewalForm {
            renewal_date: proposed,
        },
        errors: Vec::new(),
    }))
}

/// Renew a loaned copy
#[utoipa::path(
    post,
    path = "/loans/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book instance ID")
    ),
    request_body = RenewalForm,
    responses(
        (status = 200, description = "Due date renewed", body = RenewResponse),
        (status = 400, description = "Validation failed; form redisplayed", body = RenewalFormView),
        (status = 403, description = "Insufficient rights"),
        (status = 404, description = "Book instance not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(form): Json<RenewalForm>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    match state.services.loans.renew(id, &form).await? {
        RenewalOutcome::Renewed { due_back } => Ok(Json(RenewResponse {
            id,
            due_back,
            redirect: "all-loans".to_string(),
        })
        .into_response()),
        RenewalOutcome::Invalid { errors } => {
            // Redisplay the form with the submitted value preserved
            let book_instance = state.services.loans.renewal_form(id).await?.0;
            let view = RenewalFormView {
                book_instance,
                form,
                errors,
            };
            Ok((StatusCode::BAD_REQUEST, Json(view)).into_response())
        }
    }
}
