//! Builder for the single flat SELECT shape used by the listing queries.
//!
//! Fragments may be registered in any order; `build` always renders
//! `base JOIN… WHERE … AND … ORDER BY … LIMIT n OFFSET m`.
//! Caller-supplied values never become SQL text: `?` markers in a WHERE
//! template are rewritten to `$n` placeholders and the values are returned
//! alongside the query for positional binding.

use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::PgExecutor;

use crate::filter::criteria::contains_pattern;
use crate::filter::{FilterError, FilterOrderInfo, Pagination, SortDirection, SqlResult};

#[derive(Debug, Clone)]
pub struct SelectQueryBuilder {
    select: String,
    joins: Vec<String>,
    conditions: Vec<String>,
    orders: Vec<FilterOrderInfo>,
    pagination: Option<Pagination>,
    params: Vec<Value>,
    error: Option<FilterError>,
}

impl SelectQueryBuilder {
    pub fn new(select: impl Into<String>) -> Self {
        Self {
            select: select.into().trim().to_string(),
            joins: vec![],
            conditions: vec![],
            orders: vec![],
            pagination: None,
            params: vec![],
            error: None,
        }
    }

    pub fn join(mut self, fragment: &str) -> Self {
        self.joins.push(format!("JOIN {}", fragment.trim()));
        self
    }

    pub fn left_join(mut self, fragment: &str) -> Self {
        self.joins.push(format!("LEFT JOIN {}", fragment.trim()));
        self
    }

    /// Registers one predicate. Each `?` in `template` consumes the next value
    /// from `params`; the counts must match.
    pub fn where_clause<I>(mut self, template: &str, params: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let params: Vec<Value> = params.into_iter().collect();
        let placeholders = template.matches('?').count();
        if placeholders != params.len() {
            self.fail(FilterError::ParamMismatch {
                template: template.to_string(),
                placeholders,
                params: params.len(),
            });
            return self;
        }

        let mut condition = String::with_capacity(template.len() + placeholders * 2);
        let mut next = self.params.len();
        for c in template.chars() {
            if c == '?' {
                next += 1;
                condition.push_str(&format!("${}", next));
            } else {
                condition.push(c);
            }
        }

        self.params.extend(params);
        self.conditions.push(condition);
        self
    }

    /// Case-insensitive substring match on `column`.
    pub fn where_contains(self, column: &str, needle: &str) -> Self {
        let template = format!("LOWER({}) LIKE ?", column);
        self.where_clause(&template, [Value::String(contains_pattern(needle))])
    }

    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        self.order_by_direction(column, SortDirection::parse_or_asc(direction));
        self
    }

    pub fn order_by_sort(mut self, column: &str, sort: SortDirection) -> Self {
        self.order_by_direction(column, sort);
        self
    }

    pub fn paginate(mut self, pagination: &Pagination) -> Self {
        self.pagination = Some(*pagination);
        self
    }

    pub fn build(&self) -> Result<SqlResult, FilterError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let pagination = self.pagination.ok_or(FilterError::MissingPagination)?;

        let mut parts = Vec::with_capacity(self.joins.len() + 5);
        parts.push(self.select.clone());
        parts.extend(self.joins.iter().cloned());
        if !self.conditions.is_empty() {
            parts.push(format!("WHERE {}", self.conditions.join(" AND ")));
        }
        if !self.orders.is_empty() {
            let keys: Vec<String> = self
                .orders
                .iter()
                .map(|o| format!("{} {}", o.column, o.sort.to_sql()))
                .collect();
            parts.push(format!("ORDER BY {}", keys.join(", ")));
        }
        parts.push(format!("LIMIT {}", pagination.limit()));
        parts.push(format!("OFFSET {}", pagination.offset()));

        Ok(SqlResult {
            query: parts.join(" "),
            params: self.params.clone(),
        })
    }

    fn order_by_direction(&mut self, column: &str, sort: SortDirection) {
        if !is_column_reference(column) {
            self.fail(FilterError::InvalidColumn(column.to_string()));
            return;
        }
        self.orders.push(FilterOrderInfo {
            column: column.to_string(),
            sort,
        });
    }

    fn fail(&mut self, err: FilterError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// `name` or `alias.name`, each part an identifier.
fn is_column_reference(column: &str) -> bool {
    !column.is_empty()
        && column.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Executes a built statement with its parameters bound in order.
pub async fn fetch_all<'e, E>(sql: &SqlResult, executor: E) -> Result<Vec<PgRow>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query(q, p);
    }
    q.fetch_all(executor).await
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.to_string()),
    }
}
