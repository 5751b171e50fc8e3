//! Field-level validation that reports every violated rule at once.
//!
//! A [`Validator`] holds a borrowed entity and evaluates each rule as soon as
//! it is registered. Failed rules append their message; nothing short-circuits,
//! so one bad entity can produce several independent messages.
//!
//! ```
//! use film_library::validation::Validator;
//!
//! struct Login { name: String }
//!
//! let login = Login { name: String::new() };
//! let result = Validator::new(&login)
//!     .between(|l| l.name.chars().count() as i64, 3, 20, "invalid login length")
//!     .must(|l| !l.name.contains(' '), "login must not contain spaces")
//!     .validate();
//!
//! assert_eq!(result.unwrap_err().messages(), ["invalid login length"]);
//! ```

use serde::Serialize;
use thiserror::Error;

/// Ordered list of rule violations for a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct Validator<'a, T> {
    object: &'a T,
    errors: Vec<String>,
}

impl<'a, T> Validator<'a, T> {
    pub fn new(object: &'a T) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    /// Inclusive range rule over an integer projection of the entity.
    pub fn between<F>(self, field: F, min: i64, max: i64, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> i64,
    {
        self.must(
            |object| {
                let value = field(object);
                value >= min && value <= max
            },
            message,
        )
    }

    pub fn must<F>(mut self, rule: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool,
    {
        if !rule(self.object) {
            self.errors.push(message.into());
        }
        self
    }

    pub fn validate(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}
