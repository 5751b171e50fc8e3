use serde::Deserialize;

use super::pagination::Pagination;
use super::types::SortDirection;

pub const QUERY_FILM_NAME: &str = "film";
pub const QUERY_ACTOR_NAME: &str = "actor";

pub const DEFAULT_SORT_FIELD: FilmSortField = FilmSortField::Rating;
pub const DEFAULT_SORT_DIRECTION: SortDirection = SortDirection::Desc;

/// Columns a film listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmSortField {
    Name,
    Rating,
    ReleaseDate,
}

impl FilmSortField {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "name" => Some(FilmSortField::Name),
            "rating" => Some(FilmSortField::Rating),
            "release_date" => Some(FilmSortField::ReleaseDate),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            FilmSortField::Name => "f.name",
            FilmSortField::Rating => "f.rating",
            FilmSortField::ReleaseDate => "f.release_date",
        }
    }
}

/// Raw `GET /api/films` query string. Values stay strings so that garbage
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilmQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub film: Option<String>,
    pub actor: Option<String>,
    pub sort: Option<String>,
    pub direct: Option<String>,
}

/// Raw `GET /api/actors` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub actor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmFilter {
    pub pagination: Pagination,
    pub name_contains: String,
    pub actor_name_contains: String,
    pub order_by: FilmSortField,
    pub direction: SortDirection,
}

impl FilmFilter {
    /// An unknown sort field resets both field and direction to the default
    /// (`rating desc`); an unknown direction alone becomes ascending.
    pub fn from_query(query: &FilmQuery, default_page_size: i64) -> Self {
        let pagination = Pagination::from_query(
            query.page.as_deref(),
            query.size.as_deref(),
            default_page_size,
        );

        let (order_by, direction) = match query.sort.as_deref().and_then(FilmSortField::parse) {
            Some(field) => (
                field,
                SortDirection::parse_or_asc(query.direct.as_deref().unwrap_or_default()),
            ),
            None => (DEFAULT_SORT_FIELD, DEFAULT_SORT_DIRECTION),
        };

        Self {
            pagination,
            name_contains: query.film.clone().unwrap_or_default(),
            actor_name_contains: query.actor.clone().unwrap_or_default(),
            order_by,
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorsFilter {
    pub pagination: Pagination,
    pub full_name_contains: String,
}

impl ActorsFilter {
    pub fn from_query(query: &ActorQuery, default_page_size: i64) -> Self {
        Self {
            pagination: Pagination::from_query(
                query.page.as_deref(),
                query.size.as_deref(),
                default_page_size,
            ),
            full_name_contains: query.actor.clone().unwrap_or_default(),
        }
    }
}

/// Lower-cased `%needle%` LIKE pattern with `\`, `%` and `_` escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
