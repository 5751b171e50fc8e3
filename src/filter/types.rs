use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive parse; anything other than asc/desc becomes `Asc`.
    pub fn parse_or_asc(direction: &str) -> Self {
        Self::parse(direction).unwrap_or(SortDirection::Asc)
    }

    pub fn parse(direction: &str) -> Option<Self> {
        if direction.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if direction.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Rendered statement plus the positional parameters its `$n` markers refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<serde_json::Value>,
}
