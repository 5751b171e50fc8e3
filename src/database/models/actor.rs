use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

use super::{Film, UnknownVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(UnknownVariant {
                kind: "gender",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i32,
    pub full_name: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

impl<'r> FromRow<'r, PgRow> for Actor {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let gender: String = row.try_get("gender")?;
        Ok(Self {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            gender: gender.parse().map_err(|e: UnknownVariant| sqlx::Error::ColumnDecode {
                index: "gender".into(),
                source: Box::new(e),
            })?,
            birthday: row.try_get("birthday")?,
        })
    }
}

/// Request body for creating or replacing an actor. Gender stays a raw
/// string so an unknown value surfaces as a validation message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorInput {
    pub full_name: String,
    pub gender: String,
    pub birthday: NaiveDate,
}

/// Validated actor fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActor {
    pub full_name: String,
    pub gender: Gender,
    pub birthday: NaiveDate,
}

/// An actor together with every film they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorWithFilms {
    #[serde(flatten)]
    pub actor: Actor,
    pub films: Vec<Film>,
}
