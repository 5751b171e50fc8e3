use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use film_library::app::{routes, AppState};
use film_library::auth::JwtKeys;
use film_library::config::AppConfig;
use film_library::database::models::{
    ActorWithFilms, Film, FilmInput, Gender, NewActor, Role, User,
};
use film_library::database::{ActorRepository, FilmRepository, RepositoryError, UserRepository};
use film_library::filter::{ActorsFilter, FilmFilter};

pub const SECRET: &str = "integration-secret";

/// Repository stand-in that answers every call with an empty success and
/// counts how many calls reached it.
#[derive(Default)]
pub struct StubStore {
    calls: AtomicUsize,
}

impl StubStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for StubStore {
    async fn add_user(&self, login: &str, password_hash: &str, role: Role) -> Result<User, RepositoryError> {
        self.hit();
        Ok(User { id: 1, login: login.into(), password_hash: password_hash.into(), role })
    }

    async fn user_by_login(&self, _login: &str) -> Result<User, RepositoryError> {
        self.hit();
        Err(RepositoryError::NotFound("user"))
    }
}

#[async_trait]
impl ActorRepository for StubStore {
    async fn add_actor(&self, _actor: &NewActor) -> Result<i32, RepositoryError> {
        self.hit();
        Ok(1)
    }

    async fn add_actors_to_film(&self, _film_id: i32, _actor_ids: &[i32]) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_actor_full_name(&self, _id: i32, _full_name: &str) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_actor_gender(&self, _id: i32, _gender: Gender) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_actor_birthday(&self, _id: i32, _birthday: NaiveDate) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_actor(&self, _id: i32, _actor: &NewActor) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn delete_actor(&self, _id: i32) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn delete_actor_from_film(&self, _actor_id: i32, _film_id: i32) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn actors_with_films(&self, _filter: &ActorsFilter) -> Result<Vec<ActorWithFilms>, RepositoryError> {
        self.hit();
        Ok(Vec::new())
    }
}

#[async_trait]
impl FilmRepository for StubStore {
    async fn add_film(&self, _film: &FilmInput, _actor_ids: &[i32]) -> Result<i32, RepositoryError> {
        self.hit();
        Ok(1)
    }

    async fn update_film_name(&self, _id: i32, _name: &str) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_film_description(&self, _id: i32, _description: &str) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_film_release_date(&self, _id: i32, _release_date: NaiveDate) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_film_rating(&self, _id: i32, _rating: i32) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn update_film(&self, _id: i32, _film: &FilmInput) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn delete_film(&self, _id: i32) -> Result<(), RepositoryError> {
        self.hit();
        Ok(())
    }

    async fn films(&self, _filter: &FilmFilter) -> Result<Vec<Film>, RepositoryError> {
        self.hit();
        Ok(Vec::new())
    }
}

/// Full router over a fresh [`StubStore`].
pub fn app() -> anyhow::Result<(Router, Arc<StubStore>)> {
    let mut config = AppConfig::development();
    config.server.secret = SECRET.into();
    let store = Arc::new(StubStore::default());
    let state = AppState::new(config, store.clone())?;
    Ok((routes(state), store))
}

pub fn token_for(role: Role) -> anyhow::Result<String> {
    let user = User {
        id: 7,
        login: format!("{}-user", role),
        password_hash: String::new(),
        role,
    };
    Ok(JwtKeys::new(SECRET, 1)?.issue(&user)?)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}
