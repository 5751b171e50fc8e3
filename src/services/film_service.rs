use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use super::{char_len, ServiceError};
use crate::config::{FilmConfig, PaginationConfig};
use crate::database::models::{CreateFilmInput, Film, FilmInput};
use crate::database::FilmRepository;
use crate::filter::{FilmFilter, FilmQuery};
use crate::validation::{ValidationErrors, Validator};

pub const INVALID_FILM_NAME: &str = "invalid film name";
pub const INVALID_FILM_DESCRIPTION: &str = "invalid film description";
pub const INVALID_FILM_RATING: &str = "invalid film rating";

pub struct FilmService {
    repo: Arc<dyn FilmRepository>,
    rules: FilmConfig,
    pagination: PaginationConfig,
}

impl FilmService {
    pub fn new(repo: Arc<dyn FilmRepository>, rules: FilmConfig, pagination: PaginationConfig) -> Self {
        Self { repo, rules, pagination }
    }

    /// Validates the film and inserts it together with its actor links.
    pub async fn create(&self, input: &CreateFilmInput) -> Result<i32, ServiceError> {
        self.validate_film(&input.film).map_err(|e| log_err("create", e))?;
        let id = self
            .repo
            .add_film(&input.film, &input.actors_id)
            .await
            .map_err(|e| log_err("create", e))?;
        info!("Created film {} with {} actors", id, input.actors_id.len());
        Ok(id)
    }

    pub async fn update_name(&self, id: i32, name: &str) -> Result<(), ServiceError> {
        let rules = &self.rules;
        Validator::new(&name)
            .between(|n| char_len(n), rules.min_name_len, rules.max_name_len, INVALID_FILM_NAME)
            .validate()
            .map_err(|e| log_err("update_name", e))?;
        self.repo
            .update_film_name(id, name)
            .await
            .map_err(|e| log_err("update_name", e))
    }

    pub async fn update_description(&self, id: i32, description: &str) -> Result<(), ServiceError> {
        let rules = &self.rules;
        Validator::new(&description)
            .between(
                |d| char_len(d),
                rules.min_description_len,
                rules.max_description_len,
                INVALID_FILM_DESCRIPTION,
            )
            .validate()
            .map_err(|e| log_err("update_description", e))?;
        self.repo
            .update_film_description(id, description)
            .await
            .map_err(|e| log_err("update_description", e))
    }

    pub async fn update_release_date(&self, id: i32, release_date: NaiveDate) -> Result<(), ServiceError> {
        self.repo
            .update_film_release_date(id, release_date)
            .await
            .map_err(|e| log_err("update_release_date", e))
    }

    pub async fn update_rating(&self, id: i32, rating: i32) -> Result<(), ServiceError> {
        let rules = &self.rules;
        Validator::new(&rating)
            .between(|r| i64::from(*r), rules.min_rating, rules.max_rating, INVALID_FILM_RATING)
            .validate()
            .map_err(|e| log_err("update_rating", e))?;
        self.repo
            .update_film_rating(id, rating)
            .await
            .map_err(|e| log_err("update_rating", e))
    }

    pub async fn update(&self, id: i32, film: &FilmInput) -> Result<(), ServiceError> {
        self.validate_film(film).map_err(|e| log_err("update", e))?;
        self.repo.update_film(id, film).await.map_err(|e| log_err("update", e))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_film(id).await.map_err(|e| log_err("delete", e))
    }

    pub async fn list(&self, query: &FilmQuery) -> Result<Vec<Film>, ServiceError> {
        let mut filter = FilmFilter::from_query(query, self.pagination.default_size);
        if let Some(max) = self.pagination.max_size {
            filter.pagination = filter.pagination.capped(max);
        }
        self.repo.films(&filter).await.map_err(|e| log_err("list", e))
    }

    fn validate_film(&self, film: &FilmInput) -> Result<(), ValidationErrors> {
        let rules = &self.rules;
        Validator::new(film)
            .between(|f| char_len(&f.name), rules.min_name_len, rules.max_name_len, INVALID_FILM_NAME)
            .between(
                |f| char_len(&f.description),
                rules.min_description_len,
                rules.max_description_len,
                INVALID_FILM_DESCRIPTION,
            )
            .between(|f| i64::from(f.rating), rules.min_rating, rules.max_rating, INVALID_FILM_RATING)
            .validate()
    }
}

fn log_err<E: Into<ServiceError>>(op: &str, err: E) -> ServiceError {
    let err = err.into();
    error!("filmService.{}: {}", op, err);
    err
}
