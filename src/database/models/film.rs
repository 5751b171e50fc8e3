use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i32,
}

/// Film fields supplied by clients; the id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmInput {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFilmInput {
    pub film: FilmInput,
    #[serde(rename = "actorsID", default)]
    pub actors_id: Vec<i32>,
}
