use async_trait::async_trait;
use sqlx::{FromRow, Row};

use super::{
    map_violation, PgRepository, RepositoryError, UserRepository, SQLSTATE_CHECK_VIOLATION,
    SQLSTATE_UNIQUE_VIOLATION,
};
use crate::database::models::{Role, User};

fn user_violation(code: &str) -> Option<RepositoryError> {
    match code {
        "users_login_key" | SQLSTATE_UNIQUE_VIOLATION => Some(RepositoryError::AlreadyExists("user")),
        "users_role_check" | SQLSTATE_CHECK_VIOLATION => Some(RepositoryError::Invalid("invalid user role")),
        _ => None,
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn add_user(
        &self,
        login: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO users (login, password_hash, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(login)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_violation(e, user_violation))?;

        Ok(User {
            id: row.try_get("id")?,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            role,
        })
    }

    async fn user_by_login(&self, login: &str) -> Result<User, RepositoryError> {
        let row = sqlx::query("SELECT id, login, password_hash, role FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(self.pool())
            .await?
            .ok_or(RepositoryError::NotFound("user"))?;

        Ok(User::from_row(&row)?)
    }
}
