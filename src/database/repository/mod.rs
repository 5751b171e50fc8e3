//! Persistence contracts for users, actors and films, plus the Postgres
//! implementation behind them.

mod actor;
mod film;
mod user;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::models::{ActorWithFilms, Film, FilmInput, Gender, NewActor, Role, User};
use crate::filter::{ActorsFilter, FilmFilter, FilterError};

pub const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";
pub const SQLSTATE_CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// A check constraint rejected a value; carries the client message.
    #[error("{0}")]
    Invalid(&'static str),

    #[error("actors must be unique")]
    DuplicateActors,

    #[error(transparent)]
    Query(#[from] FilterError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn add_user(
        &self,
        login: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError>;

    async fn user_by_login(&self, login: &str) -> Result<User, RepositoryError>;
}

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn add_actor(&self, actor: &NewActor) -> Result<i32, RepositoryError>;

    /// Links every actor in `actor_ids` to the film. An empty list is a no-op.
    async fn add_actors_to_film(&self, film_id: i32, actor_ids: &[i32]) -> Result<(), RepositoryError>;

    async fn update_actor_full_name(&self, id: i32, full_name: &str) -> Result<(), RepositoryError>;

    async fn update_actor_gender(&self, id: i32, gender: Gender) -> Result<(), RepositoryError>;

    async fn update_actor_birthday(&self, id: i32, birthday: NaiveDate) -> Result<(), RepositoryError>;

    async fn update_actor(&self, id: i32, actor: &NewActor) -> Result<(), RepositoryError>;

    async fn delete_actor(&self, id: i32) -> Result<(), RepositoryError>;

    async fn delete_actor_from_film(&self, actor_id: i32, film_id: i32) -> Result<(), RepositoryError>;

    async fn actors_with_films(&self, filter: &ActorsFilter) -> Result<Vec<ActorWithFilms>, RepositoryError>;
}

#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Inserts the film and its actor links atomically; returns the new id.
    async fn add_film(&self, film: &FilmInput, actor_ids: &[i32]) -> Result<i32, RepositoryError>;

    async fn update_film_name(&self, id: i32, name: &str) -> Result<(), RepositoryError>;

    async fn update_film_description(&self, id: i32, description: &str) -> Result<(), RepositoryError>;

    async fn update_film_release_date(&self, id: i32, release_date: NaiveDate) -> Result<(), RepositoryError>;

    async fn update_film_rating(&self, id: i32, rating: i32) -> Result<(), RepositoryError>;

    async fn update_film(&self, id: i32, film: &FilmInput) -> Result<(), RepositoryError>;

    async fn delete_film(&self, id: i32) -> Result<(), RepositoryError>;

    async fn films(&self, filter: &FilmFilter) -> Result<Vec<Film>, RepositoryError>;
}

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `UPDATE <table> SET <column> = $1 WHERE id = $2`. Table and column
    /// are always crate-internal literals. Returns the affected row count.
    async fn update_column<T>(
        &self,
        table: &'static str,
        column: &'static str,
        id: i32,
        value: T,
    ) -> Result<u64, sqlx::Error>
    where
        T: for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + Send,
    {
        let sql = format!("UPDATE {} SET {} = $1 WHERE id = $2", table, column);
        let result = sqlx::query(&sql).bind(value).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

/// Maps a constraint violation to a domain error. `mapping` is consulted
/// with the violated constraint name first, then with the SQLSTATE code;
/// anything it does not recognise stays a database error.
pub(crate) fn map_violation<F>(err: sqlx::Error, mapping: F) -> RepositoryError
where
    F: Fn(&str) -> Option<RepositoryError>,
{
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(mapped) = db_err.constraint().and_then(|c| mapping(c)) {
            return mapped;
        }
        if let Some(mapped) = db_err.code().as_deref().and_then(|c| mapping(c)) {
            return mapped;
        }
    }
    RepositoryError::Database(err)
}

pub(crate) fn expect_affected(rows: u64, entity: &'static str) -> Result<(), RepositoryError> {
    if rows == 0 {
        Err(RepositoryError::NotFound(entity))
    } else {
        Ok(())
    }
}
