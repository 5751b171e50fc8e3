//! Application state and the tiered route table.

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::database::{ActorRepository, FilmRepository, UserRepository};
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, log_requests, require_role};
use crate::router::{Middleware, Mux};
use crate::services::{ActorService, FilmService, UserService};

/// Everything a handler can reach. Cloned per request; all fields are
/// shared handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    /// Probed by `/health` when present.
    pub pool: Option<PgPool>,
    pub users: Arc<UserService>,
    pub actors: Arc<ActorService>,
    pub films: Arc<FilmService>,
}

impl AppState {
    /// Wires the services over a single store that implements every
    /// repository trait.
    pub fn new<R>(config: AppConfig, repo: Arc<R>) -> Result<Self, JwtError>
    where
        R: UserRepository + ActorRepository + FilmRepository + 'static,
    {
        let keys = Arc::new(JwtKeys::new(
            &config.server.secret,
            config.security.jwt_expiry_hours,
        )?);

        let users = UserService::new(repo.clone(), keys.clone(), config.identity.clone());
        let actors = ActorService::new(repo.clone(), config.pagination.clone());
        let films = FilmService::new(repo, config.film.clone(), config.pagination.clone());

        Ok(Self {
            config: Arc::new(config),
            keys,
            pool: None,
            users: Arc::new(users),
            actors: Arc::new(actors),
            films: Arc::new(films),
        })
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

/// Builds the three route tiers:
///
/// - public: request logging only
/// - authenticated: logging, then token verification
/// - admin: logging, token verification, then the configured role gate
pub fn routes(state: AppState) -> Router {
    let mut public: Mux<AppState> = Mux::new();
    public.layer(Middleware::layer(from_fn(log_requests)));

    public
        .route("/health", get(public::health))
        .route("/api/register", post(public::register))
        .route("/api/login", post(public::login));

    let mut authenticated = public.group();
    authenticated.layer(Middleware::layer(from_fn_with_state(
        state.keys.clone(),
        jwt_auth_middleware,
    )));

    authenticated
        .route("/api/films", get(protected::list_films))
        .route("/api/actors", get(protected::list_actors))
        .route("/api/whoami", get(protected::whoami));

    let mut admin = authenticated.group();
    admin.layer(Middleware::layer(from_fn_with_state(
        state.config.security.admin_role,
        require_role,
    )));

    // Actors
    admin
        .route("/api/actor", post(elevated::actor::create))
        .route("/api/actors/:film_id", post(elevated::actor::add_to_film))
        .route("/api/actor/name/:id/:name", put(elevated::actor::update_name))
        .route("/api/actor/gender/:id/:gender", put(elevated::actor::update_gender))
        .route("/api/actor/birthday/:id/:birthday", put(elevated::actor::update_birthday))
        .route("/api/actor/:id", put(elevated::actor::update))
        .route("/api/actor/:id", delete(elevated::actor::delete))
        .route("/api/actor/:id/:film_id", delete(elevated::actor::delete_from_film));

    // Films
    admin
        .route("/api/film", post(elevated::film::create))
        .route("/api/film/name/:id/:name", put(elevated::film::update_name))
        .route("/api/film/description/:id", put(elevated::film::update_description))
        .route("/api/film/date/:id/:date", put(elevated::film::update_release_date))
        .route("/api/film/:id/:rating", put(elevated::film::update_rating))
        .route("/api/film/:id", put(elevated::film::update))
        .route("/api/film/:id", delete(elevated::film::delete));

    public
        .build()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
