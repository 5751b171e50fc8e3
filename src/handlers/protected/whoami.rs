// handlers/protected/whoami.rs - GET /api/whoami

use axum::Json;

use crate::middleware::Principal;

/// Echoes the principal the auth middleware extracted from the token.
pub async fn whoami(principal: Principal) -> Json<Principal> {
    Json(principal)
}
