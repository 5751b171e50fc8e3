pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::SelectQueryBuilder;
pub use repository::{
    ActorRepository, FilmRepository, PgRepository, RepositoryError, UserRepository,
};
