//! Catalog home page endpoint

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppResult;

const SESSION_COOKIE: &str = "sessionid";

/// Home page aggregate counts plus the per-session visit counter
#[derive(Serialize, ToSchema)]
pub struct HomeResponse {
    /// Total number of books
    pub num_books: i64,
    /// Total number of copies
    pub num_instances: i64,
    /// Copies currently available
    pub num_instances_available: i64,
    /// Total number of authors
    pub num_authors: i64,
    /// Total number of genres
    pub num_genres: i64,
    /// Books whose title contains "the" (case-insensitive)
    pub num_books_the: i64,
    /// Visits from this session before the current request
    pub num_visits: i64,
}

/// Catalog home page
#[utoipa::path(
    get,
    path = "/home",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog summary", body = HomeResponse)
    )
)]
pub async fn home(
    State(state): State<crate::AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<HomeResponse>)> {
    // Mint a session id on first visit
    let existing = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let (jar, session_id) = match existing {
        Some(id) => (jar, id),
        None => {
            let id = Uuid::new_v4().to_string();
            let mut cookie = Cookie::new(SESSION_COOKIE, id.clone());
            cookie.set_path("/");
            cookie.set_http_only(true);
            (jar.add(cookie), id)
        }
    };

    let counts = state.services.dashboard.counts().await?;
    let num_visits = state.services.session.record_visit(&session_id).await?;

    Ok((
        jar,
        Json(HomeResponse {
            num_books: counts.num_books,
            num_instances: counts.num_instances,
            num_instances_available: counts.num_instances_available,
            num_authors: counts.num_authors,
            num_genres: counts.num_genres,
            num_books_the: counts.num_books_the,
            num_visits,
        }),
    ))
}
