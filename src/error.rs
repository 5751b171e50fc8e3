// HTTP API Error Types
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::RepositoryError;
use crate::services::ServiceError;
use crate::validation::ValidationErrors;

pub const UNKNOWN_ERROR: &str = "unknown error";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError { messages: Vec<String> },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::ValidationError { messages } => messages.join("; "),
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg) => msg.clone(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { messages } => json!({ "errors": messages }),
            _ => json!({ "error": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(messages: Vec<String>) -> Self {
        ApiError::ValidationError { messages }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

// Convert other error types to ApiError
impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::validation_error(err.into_messages())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => ApiError::not_found(err.to_string()),
            RepositoryError::AlreadyExists(_) | RepositoryError::DuplicateActors => {
                ApiError::conflict(err.to_string())
            }
            RepositoryError::Invalid(msg) => ApiError::bad_request(msg),
            RepositoryError::Query(e) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Query build error: {}", e);
                ApiError::internal_server_error(UNKNOWN_ERROR)
            }
            RepositoryError::Database(e) => {
                tracing::error!("SQLx error: {}", e);
                ApiError::internal_server_error(UNKNOWN_ERROR)
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => e.into(),
            ServiceError::Repository(e) => e.into(),
            ServiceError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::internal_server_error(UNKNOWN_ERROR)
            }
            ServiceError::PasswordHash(e) => {
                tracing::error!("Password hashing error: {}", e);
                ApiError::internal_server_error(UNKNOWN_ERROR)
            }
            ServiceError::Blocking(e) => {
                tracing::error!("Password task error: {}", e);
                ApiError::internal_server_error(UNKNOWN_ERROR)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        ApiError::bad_request("bad request")
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameters: {}", rejection.body_text());
        ApiError::bad_request("bad request")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {}", rejection.body_text());
        ApiError::bad_request("bad request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_statuses() {
        let cases = [
            (RepositoryError::NotFound("film"), StatusCode::NOT_FOUND, "film not found"),
            (RepositoryError::AlreadyExists("user"), StatusCode::CONFLICT, "user already exists"),
            (RepositoryError::DuplicateActors, StatusCode::CONFLICT, "actors must be unique"),
            (RepositoryError::Invalid("invalid film rating"), StatusCode::BAD_REQUEST, "invalid film rating"),
            (RepositoryError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_ERROR),
        ];
        for (err, status, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status_code(), status);
            assert_eq!(api.to_json(), json!({ "error": message }));
        }
    }

    #[test]
    fn validation_errors_use_list_envelope() {
        let api = ApiError::validation_error(vec!["invalid film name".into(), "invalid film rating".into()]);
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            api.to_json(),
            json!({ "errors": ["invalid film name", "invalid film rating"] })
        );
    }

    #[test]
    fn bad_credentials_are_unauthorized() {
        let api: ApiError = ServiceError::InvalidCredentials.into();
        assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(api.message(), "invalid login or password");
    }
}
