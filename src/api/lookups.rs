//! Genre and language lookup endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::lookup::{Genre, Language},
};

/// List genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    responses(
        (status = 200, description = "List of genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// List languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    responses(
        (status = 200, description = "List of languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}
