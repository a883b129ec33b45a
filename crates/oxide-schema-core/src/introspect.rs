//! Live schema introspection.
//!
//! Each dialect describes a table with its own catalog query; the
//! [`Catalog`] trait captures the dialect-specific parts (which queries to
//! run and how to read their rows) while [`describe_table`] drives them
//! the same way for every engine.

use tracing::debug;

use crate::connection::{Connection, Row};
use crate::dialect::DialectProfile;
use crate::error::Result;

/// One column as reported by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Native type token as reported, possibly with a length suffix.
    pub native_type: String,
    /// Whether the column is the primary key.
    pub primary_key: bool,
}

impl ColumnInfo {
    /// Creates a column description.
    #[must_use]
    pub fn new(name: impl Into<String>, native_type: impl Into<String>, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            native_type: native_type.into(),
            primary_key,
        }
    }
}

/// Dialect-specific catalog access.
pub trait Catalog: Send + Sync {
    /// Returns a query that yields no rows when the table does not exist, if
    /// the describe query alone cannot tell.
    fn existence_query(&self, profile: &DialectProfile, table: &str) -> Option<String>;

    /// Returns the query listing the table's columns.
    fn describe_query(&self, profile: &DialectProfile, table: &str) -> String;

    /// Reads one row of the describe query.
    fn column_from_row(&self, table: &str, row: &Row) -> Result<ColumnInfo>;
}

/// Describes a table, returning `None` if it does not exist.
///
/// Columns come back in the database's own column order.
pub async fn describe_table<C: Connection>(
    conn: &C,
    catalog: &dyn Catalog,
    profile: &DialectProfile,
    table: &str,
) -> Result<Option<Vec<ColumnInfo>>> {
    if let Some(sql) = catalog.existence_query(profile, table) {
        debug!(table, sql = %sql, "Checking table existence");
        if conn.fetch_all(&sql).await?.is_empty() {
            return Ok(None);
        }
    }

    let sql = catalog.describe_query(profile, table);
    debug!(table, sql = %sql, "Describing table");
    let rows = conn.fetch_all(&sql).await?;
    if rows.is_empty() {
        return Ok(None);
    }

    rows.iter()
        .map(|row| catalog.column_from_row(table, row))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Quotes a value as a SQL string literal.
pub(crate) fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
