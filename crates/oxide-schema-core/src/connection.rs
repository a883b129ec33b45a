//! Database connection capability.
//!
//! The core needs very little from a database: run a statement, fetch
//! rows as name/value maps, and say which dialect it speaks. Driver crates
//! (oxide-schema's `SqlxConnection`, test fakes) implement [`Connection`].

use std::future::Future;

use indexmap::IndexMap;

use crate::dialect::DialectKind;
use crate::error::Result;

/// A single value read from a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Any integer column.
    Integer(i64),
    /// Any textual column.
    Text(String),
}

impl Value {
    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, parsing numeric text if needed.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A result row: column name to value, in result order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(IndexMap<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }

    /// Returns a column value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Returns a column as text.
    #[must_use]
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    /// Returns a column as an integer.
    #[must_use]
    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }

    /// Iterates over the columns in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Minimal database capability required by the migrator.
pub trait Connection {
    /// Returns the dialect this connection speaks.
    fn dialect(&self) -> DialectKind;

    /// Runs a query and returns every row.
    fn fetch_all(&self, sql: &str) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Runs a statement, discarding any result.
    fn execute(&self, sql: &str) -> impl Future<Output = Result<()>> + Send;
}
