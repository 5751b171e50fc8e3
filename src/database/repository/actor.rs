use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgExecutor, Row};

use super::{
    expect_affected, map_violation, ActorRepository, PgRepository, RepositoryError,
    SQLSTATE_CHECK_VIOLATION,
};
use crate::database::models::{Actor, ActorWithFilms, Film, Gender, NewActor};
use crate::database::query_builder::{self, SelectQueryBuilder};
use crate::filter::ActorsFilter;

const ACTORS_WITH_FILMS_SELECT: &str = "SELECT a.id, a.full_name, a.gender, a.birthday, \
     f.id AS film_id, f.name AS film_name, f.description AS film_description, \
     f.release_date AS film_release_date, f.rating AS film_rating FROM actors AS a";

fn actor_violation(code: &str) -> Option<RepositoryError> {
    match code {
        "actors_gender_check" | SQLSTATE_CHECK_VIOLATION => Some(RepositoryError::Invalid("invalid actor gender")),
        _ => None,
    }
}

fn film_actor_violation(code: &str) -> Option<RepositoryError> {
    match code {
        "film_actor_pkey" => Some(RepositoryError::DuplicateActors),
        "film_actor_actor_id_fkey" => Some(RepositoryError::NotFound("actor")),
        "film_actor_film_id_fkey" => Some(RepositoryError::NotFound("film")),
        _ => None,
    }
}

/// Single multi-row insert into `film_actor`, every id bound.
pub(crate) async fn insert_film_actors<'e, E>(
    executor: E,
    film_id: i32,
    actor_ids: &[i32],
) -> Result<(), RepositoryError>
where
    E: PgExecutor<'e>,
{
    if actor_ids.is_empty() {
        return Ok(());
    }

    let mut qb = sqlx::QueryBuilder::<sqlx::Postgres>::new("INSERT INTO film_actor (actor_id, film_id) ");
    qb.push_values(actor_ids, |mut row, actor_id| {
        row.push_bind(*actor_id).push_bind(film_id);
    });

    qb.build()
        .execute(executor)
        .await
        .map_err(|e| map_violation(e, film_actor_violation))?;
    Ok(())
}

#[async_trait]
impl ActorRepository for PgRepository {
    async fn add_actor(&self, actor: &NewActor) -> Result<i32, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO actors (full_name, gender, birthday) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&actor.full_name)
        .bind(actor.gender.as_str())
        .bind(actor.birthday)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_violation(e, actor_violation))?;

        Ok(row.try_get("id")?)
    }

    async fn add_actors_to_film(&self, film_id: i32, actor_ids: &[i32]) -> Result<(), RepositoryError> {
        insert_film_actors(self.pool(), film_id, actor_ids).await
    }

    async fn update_actor_full_name(&self, id: i32, full_name: &str) -> Result<(), RepositoryError> {
        let rows = self.update_column("actors", "full_name", id, full_name).await?;
        expect_affected(rows, "actor")
    }

    async fn update_actor_gender(&self, id: i32, gender: Gender) -> Result<(), RepositoryError> {
        let rows = self
            .update_column("actors", "gender", id, gender.as_str())
            .await
            .map_err(|e| map_violation(e, actor_violation))?;
        expect_affected(rows, "actor")
    }

    async fn update_actor_birthday(&self, id: i32, birthday: NaiveDate) -> Result<(), RepositoryError> {
        let rows = self.update_column("actors", "birthday", id, birthday).await?;
        expect_affected(rows, "actor")
    }

    async fn update_actor(&self, id: i32, actor: &NewActor) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE actors SET (full_name, gender, birthday) = ($1, $2, $3) WHERE id = $4",
        )
        .bind(&actor.full_name)
        .bind(actor.gender.as_str())
        .bind(actor.birthday)
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(|e| map_violation(e, actor_violation))?;

        expect_affected(result.rows_affected(), "actor")
    }

    async fn delete_actor(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result.rows_affected(), "actor")
    }

    async fn delete_actor_from_film(&self, actor_id: i32, film_id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM film_actor WHERE film_id = $1 AND actor_id = $2")
            .bind(film_id)
            .bind(actor_id)
            .execute(self.pool())
            .await?;
        expect_affected(result.rows_affected(), "actor")
    }

    async fn actors_with_films(&self, filter: &ActorsFilter) -> Result<Vec<ActorWithFilms>, RepositoryError> {
        let mut builder = SelectQueryBuilder::new(ACTORS_WITH_FILMS_SELECT)
            .left_join("film_actor AS fa ON a.id = fa.actor_id")
            .left_join("films AS f ON f.id = fa.film_id");
        if !filter.full_name_contains.is_empty() {
            builder = builder.where_contains("a.full_name", &filter.full_name_contains);
        }
        let sql = builder
            .order_by("a.id", "asc")
            .order_by("f.id", "asc")
            .paginate(&filter.pagination)
            .build()?;

        let rows = query_builder::fetch_all(&sql, self.pool()).await?;

        let mut actors: Vec<ActorWithFilms> = Vec::new();
        for row in rows.iter() {
            let actor_id: i32 = row.try_get("id")?;
            if actors.last().map(|a| a.actor.id) != Some(actor_id) {
                actors.push(ActorWithFilms {
                    actor: Actor::from_row(row)?,
                    films: Vec::new(),
                });
            }

            let film_id: Option<i32> = row.try_get("film_id")?;
            if let (Some(film_id), Some(current)) = (film_id, actors.last_mut()) {
                current.films.push(Film {
                    id: film_id,
                    name: row.try_get("film_name")?,
                    description: row.try_get("film_description")?,
                    release_date: row.try_get("film_release_date")?,
                    rating: row.try_get("film_rating")?,
                });
            }
        }

        Ok(actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_violations_map_by_constraint_name() {
        assert!(matches!(film_actor_violation("film_actor_pkey"), Some(RepositoryError::DuplicateActors)));
        assert!(matches!(
            film_actor_violation("film_actor_actor_id_fkey"),
            Some(RepositoryError::NotFound("actor"))
        ));
        assert!(matches!(
            film_actor_violation("film_actor_film_id_fkey"),
            Some(RepositoryError::NotFound("film"))
        ));
        // A bare foreign-key SQLSTATE cannot tell actor from film.
        assert!(film_actor_violation("23503").is_none());
    }
}
