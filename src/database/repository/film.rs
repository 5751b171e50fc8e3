use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, Row};
use tracing::debug;

use super::actor::insert_film_actors;
use super::{
    expect_affected, map_violation, FilmRepository, PgRepository, RepositoryError,
    SQLSTATE_UNIQUE_VIOLATION,
};
use crate::database::models::{Film, FilmInput};
use crate::database::query_builder::{self, SelectQueryBuilder};
use crate::filter::FilmFilter;

const FILMS_SELECT: &str =
    "SELECT DISTINCT f.id, f.name, f.description, f.release_date, f.rating FROM films AS f";

fn film_violation(code: &str) -> Option<RepositoryError> {
    match code {
        "films_name_key" | SQLSTATE_UNIQUE_VIOLATION => Some(RepositoryError::AlreadyExists("film")),
        "films_name_check" => Some(RepositoryError::Invalid("invalid film name")),
        "films_rating_check" => Some(RepositoryError::Invalid("invalid film rating")),
        _ => None,
    }
}

#[async_trait]
impl FilmRepository for PgRepository {
    async fn add_film(&self, film: &FilmInput, actor_ids: &[i32]) -> Result<i32, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(
            "INSERT INTO films (name, description, release_date, rating) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_violation(e, film_violation))?;
        let film_id: i32 = row.try_get("id")?;

        insert_film_actors(&mut *tx, film_id, actor_ids).await?;

        tx.commit().await?;
        debug!("Inserted film {} with {} actors", film_id, actor_ids.len());
        Ok(film_id)
    }

    async fn update_film_name(&self, id: i32, name: &str) -> Result<(), RepositoryError> {
        let rows = self
            .update_column("films", "name", id, name)
            .await
            .map_err(|e| map_violation(e, film_violation))?;
        expect_affected(rows, "film")
    }

    async fn update_film_description(&self, id: i32, description: &str) -> Result<(), RepositoryError> {
        let rows = self.update_column("films", "description", id, description).await?;
        expect_affected(rows, "film")
    }

    async fn update_film_release_date(&self, id: i32, release_date: NaiveDate) -> Result<(), RepositoryError> {
        let rows = self.update_column("films", "release_date", id, release_date).await?;
        expect_affected(rows, "film")
    }

    async fn update_film_rating(&self, id: i32, rating: i32) -> Result<(), RepositoryError> {
        let rows = self
            .update_column("films", "rating", id, rating)
            .await
            .map_err(|e| map_violation(e, film_violation))?;
        expect_affected(rows, "film")
    }

    async fn update_film(&self, id: i32, film: &FilmInput) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE films SET (name, description, release_date, rating) = ($1, $2, $3, $4) WHERE id = $5",
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.rating)
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| map_violation(e, film_violation))?;

        expect_affected(result.rows_affected(), "film")
    }

    async fn delete_film(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM films WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result.rows_affected(), "film")
    }

    async fn films(&self, filter: &FilmFilter) -> Result<Vec<Film>, RepositoryError> {
        let mut builder = SelectQueryBuilder::new(FILMS_SELECT);
        if !filter.actor_name_contains.is_empty() {
            builder = builder
                .join("film_actor AS fa ON f.id = fa.film_id")
                .join("actors AS a ON a.id = fa.actor_id")
                .where_contains("a.full_name", &filter.actor_name_contains);
        }
        if !filter.name_contains.is_empty() {
            builder = builder.where_contains("f.name", &filter.name_contains);
        }
        let sql = builder
            .order_by_sort(filter.order_by.column(), filter.direction)
            .order_by("f.id", "asc")
            .paginate(&filter.pagination)
            .build()?;

        let rows = query_builder::fetch_all(&sql, self.pool()).await?;
        let films = rows
            .iter()
            .map(Film::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(films)
    }
}
