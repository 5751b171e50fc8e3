//! Page/size normalization into a LIMIT/OFFSET pair.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: i64,
    pub page_size: i64,
}

impl Pagination {
    /// Normalizes with [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self::with_default(page_number, page_size, DEFAULT_PAGE_SIZE)
    }

    /// Non-positive page becomes 1, non-positive size becomes `default_size`.
    pub fn with_default(page_number: i64, page_size: i64, default_size: i64) -> Self {
        Self {
            page_number: if page_number <= 0 { 1 } else { page_number },
            page_size: if page_size <= 0 { default_size.max(1) } else { page_size },
        }
    }

    /// Lenient variant for raw query-string values: absent or unparseable
    /// input takes the defaults.
    pub fn from_query(page: Option<&str>, size: Option<&str>, default_size: i64) -> Self {
        Self::with_default(
            parse_or(page, 1),
            parse_or(size, default_size),
            default_size,
        )
    }

    /// Clamps the page size to `max`. Not applied by `new`.
    pub fn capped(self, max: i64) -> Self {
        Self {
            page_size: self.page_size.min(max.max(1)),
            ..self
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
