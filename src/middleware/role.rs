use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::Principal;
use crate::database::models::Role;
use crate::error::ApiError;

/// Lets the request through only when the authenticated principal holds
/// `required`. Must run after `jwt_auth_middleware`.
pub async fn require_role(
    State(required): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match request.extensions().get::<Principal>() {
        Some(principal) if principal.role == required => Ok(next.run(request).await),
        Some(principal) => {
            tracing::warn!(
                "Forbidden: {} has role {}, {} required",
                principal.login,
                principal.role,
                required
            );
            Err(ApiError::forbidden("forbidden"))
        }
        None => {
            tracing::warn!("Forbidden: role gate reached without a principal");
            Err(ApiError::forbidden("forbidden"))
        }
    }
}
