// handlers/elevated/film.rs - Film mutations under /api/film

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{CreateFilmInput, FilmInput};
use crate::error::ApiError;
use crate::handlers::extract::parse_date;
use crate::handlers::{ApiJson, ApiPath};

#[derive(Debug, Deserialize)]
pub struct DescriptionInput {
    pub description: String,
}

/// POST /api/film - body `{"film": {...}, "actorsID": [..]}`, returns `{"id"}`
///
/// The film and its actor links are stored together or not at all.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateFilmInput>,
) -> Result<Json<Value>, ApiError> {
    let id = state.films.create(&input).await?;
    Ok(Json(json!({ "id": id })))
}

/// PUT /api/film/name/:id/:name
pub async fn update_name(
    State(state): State<AppState>,
    ApiPath((id, name)): ApiPath<(i32, String)>,
) -> Result<(), ApiError> {
    state.films.update_name(id, &name).await?;
    Ok(())
}

/// PUT /api/film/description/:id - body `{"description"}`
pub async fn update_description(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<DescriptionInput>,
) -> Result<(), ApiError> {
    state.films.update_description(id, &input.description).await?;
    Ok(())
}

/// PUT /api/film/date/:id/:date - `YYYY-MM-DD`
pub async fn update_release_date(
    State(state): State<AppState>,
    ApiPath((id, date)): ApiPath<(i32, String)>,
) -> Result<(), ApiError> {
    let date = parse_date(&date)?;
    state.films.update_release_date(id, date).await?;
    Ok(())
}

/// PUT /api/film/:id/:rating
pub async fn update_rating(
    State(state): State<AppState>,
    ApiPath((id, rating)): ApiPath<(i32, i32)>,
) -> Result<(), ApiError> {
    state.films.update_rating(id, rating).await?;
    Ok(())
}

/// PUT /api/film/:id - replaces every field
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(film): ApiJson<FilmInput>,
) -> Result<(), ApiError> {
    state.films.update(id, &film).await?;
    Ok(())
}

/// DELETE /api/film/:id
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(), ApiError> {
    state.films.delete(id).await?;
    Ok(())
}
