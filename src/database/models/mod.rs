pub mod actor;
pub mod film;
pub mod user;

pub use actor::{Actor, ActorInput, ActorWithFilms, Gender, NewActor};
pub use film::{CreateFilmInput, Film, FilmInput};
pub use user::{LoginInput, RegisterInput, Role, User};

use thiserror::Error;

/// A string that is not a member of one of the closed enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
