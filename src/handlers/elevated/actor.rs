// handlers/elevated/actor.rs - Actor mutations under /api/actor and /api/actors

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::ActorInput;
use crate::error::ApiError;
use crate::handlers::extract::parse_date;
use crate::handlers::{ApiJson, ApiPath};

/// POST /api/actor - body `{"fullName", "gender", "birthday"}`, returns `{"id"}`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ActorInput>,
) -> Result<Json<Value>, ApiError> {
    let id = state.actors.create(&input).await?;
    Ok(Json(json!({ "id": id })))
}

/// POST /api/actors/:film_id - body is a JSON array of actor ids
pub async fn add_to_film(
    State(state): State<AppState>,
    ApiPath(film_id): ApiPath<i32>,
    ApiJson(actor_ids): ApiJson<Vec<i32>>,
) -> Result<(), ApiError> {
    state.actors.add_to_film(film_id, &actor_ids).await?;
    Ok(())
}

/// PUT /api/actor/name/:id/:name
pub async fn update_name(
    State(state): State<AppState>,
    ApiPath((id, name)): ApiPath<(i32, String)>,
) -> Result<(), ApiError> {
    state.actors.update_full_name(id, &name).await?;
    Ok(())
}

/// PUT /api/actor/gender/:id/:gender
pub async fn update_gender(
    State(state): State<AppState>,
    ApiPath((id, gender)): ApiPath<(i32, String)>,
) -> Result<(), ApiError> {
    state.actors.update_gender(id, &gender).await?;
    Ok(())
}

/// PUT /api/actor/birthday/:id/:birthday - `YYYY-MM-DD`
pub async fn update_birthday(
    State(state): State<AppState>,
    ApiPath((id, birthday)): ApiPath<(i32, String)>,
) -> Result<(), ApiError> {
    let birthday = parse_date(&birthday)?;
    state.actors.update_birthday(id, birthday).await?;
    Ok(())
}

/// PUT /api/actor/:id - replaces every field
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ActorInput>,
) -> Result<(), ApiError> {
    state.actors.update(id, &input).await?;
    Ok(())
}

/// DELETE /api/actor/:id
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(), ApiError> {
    state.actors.delete(id).await?;
    Ok(())
}

/// DELETE /api/actor/:id/:film_id - unlinks the actor from one film
pub async fn delete_from_film(
    State(state): State<AppState>,
    ApiPath((id, film_id)): ApiPath<(i32, i32)>,
) -> Result<(), ApiError> {
    state.actors.delete_from_film(id, film_id).await?;
    Ok(())
}
