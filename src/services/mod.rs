pub mod actor_service;
pub mod film_service;
pub mod user_service;

pub use actor_service::ActorService;
pub use film_service::FilmService;
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::JwtError;
use crate::database::RepositoryError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Unknown login and wrong password are reported identically.
    #[error("invalid login or password")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),

    #[error("password task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

/// Character count used by every length rule.
pub(crate) fn char_len(value: &str) -> i64 {
    value.chars().count() as i64
}
