// handlers/public/auth.rs - POST /api/register, POST /api/login

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{LoginInput, RegisterInput};
use crate::error::ApiError;
use crate::handlers::ApiJson;

/// POST /api/register - create an account and receive a token
///
/// Body: `{"login": "...", "password": "...", "role": "admin" | "viewer"}`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<Json<Value>, ApiError> {
    let token = state.users.register(&input).await?;
    Ok(Json(json!({ "token": token })))
}

/// POST /api/login - exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<Value>, ApiError> {
    let token = state.users.login(&input).await?;
    Ok(Json(json!({ "token": token })))
}
