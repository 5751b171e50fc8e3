use std::sync::Arc;

use chrono::NaiveDate;
use tracing::error;

use super::{ServiceError, char_len};
use crate::config::PaginationConfig;
use crate::database::models::{ActorInput, ActorWithFilms, Gender, NewActor};
use crate::database::ActorRepository;
use crate::filter::{ActorQuery, ActorsFilter};
use crate::validation::{ValidationErrors, Validator};

pub const INVALID_FULL_NAME: &str = "full name must be at least 1 letter long";
pub const INVALID_GENDER: &str = "gender must be male or female";

pub struct ActorService {
    repo: Arc<dyn ActorRepository>,
    pagination: PaginationConfig,
}

impl ActorService {
    pub fn new(repo: Arc<dyn ActorRepository>, pagination: PaginationConfig) -> Self {
        Self { repo, pagination }
    }

    pub async fn create(&self, input: &ActorInput) -> Result<i32, ServiceError> {
        let actor = validate_actor(input).map_err(|e| log_err("create", e))?;
        self.repo.add_actor(&actor).await.map_err(|e| log_err("create", e))
    }

    pub async fn add_to_film(&self, film_id: i32, actor_ids: &[i32]) -> Result<(), ServiceError> {
        self.repo
            .add_actors_to_film(film_id, actor_ids)
            .await
            .map_err(|e| log_err("add_to_film", e))
    }

    pub async fn update_full_name(&self, id: i32, full_name: &str) -> Result<(), ServiceError> {
        Validator::new(&full_name)
            .must(|name| char_len(name) > 0, INVALID_FULL_NAME)
            .validate()
            .map_err(|e| log_err("update_full_name", e))?;
        self.repo
            .update_actor_full_name(id, full_name)
            .await
            .map_err(|e| log_err("update_full_name", e))
    }

    pub async fn update_gender(&self, id: i32, gender: &str) -> Result<(), ServiceError> {
        let gender = gender
            .parse::<Gender>()
            .map_err(|_| log_err("update_gender", ValidationErrors::single(INVALID_GENDER)))?;
        self.repo
            .update_actor_gender(id, gender)
            .await
            .map_err(|e| log_err("update_gender", e))
    }

    pub async fn update_birthday(&self, id: i32, birthday: NaiveDate) -> Result<(), ServiceError> {
        self.repo
            .update_actor_birthday(id, birthday)
            .await
            .map_err(|e| log_err("update_birthday", e))
    }

    pub async fn update(&self, id: i32, input: &ActorInput) -> Result<(), ServiceError> {
        let actor = validate_actor(input).map_err(|e| log_err("update", e))?;
        self.repo.update_actor(id, &actor).await.map_err(|e| log_err("update", e))
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_actor(id).await.map_err(|e| log_err("delete", e))
    }

    pub async fn delete_from_film(&self, actor_id: i32, film_id: i32) -> Result<(), ServiceError> {
        self.repo
            .delete_actor_from_film(actor_id, film_id)
            .await
            .map_err(|e| log_err("delete_from_film", e))
    }

    pub async fn list(&self, query: &ActorQuery) -> Result<Vec<ActorWithFilms>, ServiceError> {
        let mut filter = ActorsFilter::from_query(query, self.pagination.default_size);
        if let Some(max) = self.pagination.max_size {
            filter.pagination = filter.pagination.capped(max);
        }
        self.repo
            .actors_with_films(&filter)
            .await
            .map_err(|e| log_err("list", e))
    }
}

fn validate_actor(input: &ActorInput) -> Result<NewActor, ValidationErrors> {
    let gender = input.gender.parse::<Gender>().ok();

    Validator::new(input)
        .must(|a| char_len(&a.full_name) > 0, INVALID_FULL_NAME)
        .must(|_| gender.is_some(), INVALID_GENDER)
        .validate()?;

    Ok(NewActor {
        full_name: input.full_name.clone(),
        gender: gender.ok_or_else(|| ValidationErrors::single(INVALID_GENDER))?,
        birthday: input.birthday,
    })
}

fn log_err<E: Into<ServiceError>>(op: &str, err: E) -> ServiceError {
    let err = err.into();
    error!("actorService.{}: {}", op, err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::RepositoryError;
    use crate::testing::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> ActorService {
        ActorService::new(store, PaginationConfig { default_size: 10, max_size: None })
    }

    fn input(full_name: &str, gender: &str) -> ActorInput {
        ActorInput {
            full_name: full_name.into(),
            gender: gender.into(),
            birthday: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn invalid_actor_collects_both_messages() {
        let store = Arc::new(MemoryStore::default());
        let err = service(store.clone()).create(&input("", "other")).await.unwrap_err();
        match err {
            ServiceError::Validation(e) => assert_eq!(e.messages(), [INVALID_FULL_NAME, INVALID_GENDER]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_update_and_list() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone());
        let id = svc.create(&input("Keanu Reeves", "male")).await.unwrap();

        svc.update_full_name(id, "Keanu Charles Reeves").await.unwrap();
        svc.update_gender(id, "female").await.unwrap();

        let actors = svc.list(&ActorQuery::default()).await.unwrap();
        assert_eq!(actors.len(), 1);
        assert_eq!(actors[0].actor.full_name, "Keanu Charles Reeves");
        assert_eq!(actors[0].actor.gender, Gender::Female);
    }

    #[tokio::test]
    async fn targeted_updates_validate_before_repository() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone());

        let err = svc.update_full_name(1, "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = svc.update_gender(1, "robot").await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_GENDER);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn missing_actor_is_not_found() {
        let store = Arc::new(MemoryStore::default());
        let err = service(store).delete(42).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::NotFound("actor"))));
    }

    #[tokio::test]
    async fn linking_twice_reports_duplicates() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone());
        let actor = svc.create(&input("Sigourney Weaver", "female")).await.unwrap();
        let film = store.insert_film("Alien");

        svc.add_to_film(film, &[actor]).await.unwrap();
        let err = svc.add_to_film(film, &[actor]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::DuplicateActors)));

        svc.delete_from_film(actor, film).await.unwrap();
        let err = svc.delete_from_film(actor, film).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::NotFound(_))));
    }
}
