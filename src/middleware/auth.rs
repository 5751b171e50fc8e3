use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;

use crate::auth::{Claims, JwtKeys};
use crate::database::models::Role;
use crate::error::ApiError;

/// Authenticated caller extracted from the token
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i32,
    pub login: String,
    pub role: Role,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            login: claims.login,
            role: claims.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("unauthorized"))
    }
}

/// JWT authentication middleware that validates tokens and extracts the principal
pub async fn jwt_auth_middleware(
    State(keys): State<Arc<JwtKeys>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).ok_or_else(|| {
        tracing::debug!("Rejected request without usable Authorization header");
        ApiError::unauthorized("unauthorized")
    })?;

    let claims = keys.verify(&token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        ApiError::unauthorized("bad token")
    })?;

    request.extensions_mut().insert(Principal::from(claims));

    Ok(next.run(request).await)
}

/// The second space-separated part of `Authorization`.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.split(' ').nth(1).map(str::to_string)
}
