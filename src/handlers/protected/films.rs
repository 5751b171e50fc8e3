// handlers/protected/films.rs - GET /api/films

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::Film;
use crate::error::ApiError;
use crate::filter::FilmQuery;
use crate::handlers::ApiQuery;

/// GET /api/films?page&size&film&actor&sort&direct
///
/// `film` and `actor` are case-insensitive substring filters. `sort` is one
/// of `name`, `rating`, `release_date`; anything else lists by rating,
/// highest first.
pub async fn list_films(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FilmQuery>,
) -> Result<Json<Vec<Film>>, ApiError> {
    Ok(Json(state.films.list(&query).await?))
}
