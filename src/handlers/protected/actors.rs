// handlers/protected/actors.rs - GET /api/actors

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::models::ActorWithFilms;
use crate::error::ApiError;
use crate::filter::ActorQuery;
use crate::handlers::ApiQuery;

/// GET /api/actors?page&size&actor - actors with the films they appear in
pub async fn list_actors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ActorQuery>,
) -> Result<Json<Vec<ActorWithFilms>>, ApiError> {
    Ok(Json(state.actors.list(&query).await?))
}
