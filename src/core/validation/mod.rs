//! Field validation
//!
//! A [`Validator`] collects at most one message per field. Every mutating
//! path runs its checks through a validator before touching storage, and
//! the collected [`ValidationErrors`] travel unchanged up to the HTTP layer.

pub mod validators;

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

pub use validators::{permitted_value, unique};

/// Field name → message, in the order the failures were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msgs: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", msgs.join(", "))
    }
}

/// Accumulates validation failures, first failure per field wins.
///
/// # Example
///
/// ```rust
/// use edtoys::core::validation::Validator;
///
/// let mut v = Validator::new();
/// v.check(false, "title", "must be provided");
/// v.check(false, "title", "must not be more than 500 bytes long");
///
/// assert!(!v.valid());
/// assert_eq!(v.errors().get("title"), Some("must be provided"));
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has a recorded message.
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record `message` for `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_error(field, message);
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// `Ok(())` when valid, otherwise the collected errors.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.valid() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
