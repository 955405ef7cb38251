//! Equality criteria for selecting records.
//!
//! The store has no query language: a [`Criteria`] is a list of `field == value`
//! conditions joined by logical AND, evaluated by a linear scan over a collection.
//! Empty criteria match every record.
//!
//! ```ignore
//! use wormdb::query::Criteria;
//!
//! let criteria = Criteria::new()
//!     .eq("name", "Alice")
//!     .eq("age", 30);
//! ```
//!
//! The facade crate also provides `criteria!(name = "Alice", age = 30)`.

use serde_json::Value;

use crate::backend::Record;

/// A conjunction of exact-match field filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    filters: Vec<(String, Value)>,
}

impl Criteria {
    /// Creates empty criteria, which match every record.
    pub fn new() -> Self {
        Criteria { filters: Vec::new() }
    }

    /// Adds an equality condition.
    ///
    /// Matches records whose `field` equals `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Returns `true` if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates over the `(field, value)` conditions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.filters
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Returns `true` if `record` satisfies every condition.
    ///
    /// A record that lacks one of the fields never matches.
    pub fn matches(&self, record: &Record) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| match record.get(field) {
                Some(actual) => values_equal(actual, expected),
                None => false,
            })
    }

    /// Returns the records that satisfy these criteria, preserving their order.
    pub fn filter<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a Record> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Criteria
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Criteria {
            filters: iter
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        }
    }
}

/// Structural equality with numbers compared by value, so `1` equals `1.0`.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                return a == b;
            }
            if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                return a == b;
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).is_some_and(|b| values_equal(a, b)))
        }
        _ => left == right,
    }
}
