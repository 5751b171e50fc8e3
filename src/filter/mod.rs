pub mod criteria;
pub mod error;
pub mod pagination;
pub mod types;

pub use criteria::{ActorQuery, ActorsFilter, FilmFilter, FilmQuery, FilmSortField};
pub use error::FilterError;
pub use pagination::Pagination;
pub use types::*;
