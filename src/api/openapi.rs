//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, dashboard, health, loans, lookups};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Alexandria API",
        version = "0.3.0",
        description = "Library Catalog REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Catalog home
        dashboard::home,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Lookups
        lookups::list_genres,
        lookups::list_languages,
        // Loans
        loans::my_loans,
        loans::all_loans,
        loans::renewal_form,
        loans::renew_instance,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Lookups
            crate::models::lookup::Genre,
            crate::models::lookup::Language,
            // Instances & loans
            crate::models::instance::BookInstance,
            crate::models::instance::InstanceStatus,
            crate::models::instance::LoanDetails,
            crate::models::instance::RenewalForm,
            crate::models::instance::FieldError,
            crate::models::user::Borrower,
            loans::RenewalFormView,
            loans::RenewResponse,
            authors::DeleteResponse,
            // Catalog home
            dashboard::HomeResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog home and lookups"),
        (name = "books", description = "Book records"),
        (name = "authors", description = "Author records"),
        (name = "loans", description = "Loan listings and renewals")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
