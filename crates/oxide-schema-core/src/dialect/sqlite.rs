//! SQLite profile and catalog.
//!
//! SQLite keeps the declared type text of every column, so whatever the
//! renderer wrote (`varchar(255)`, `datetime`) comes back from
//! `pragma table_info` verbatim.

use crate::connection::Row;
use crate::error::{Result, SchemaError};
use crate::introspect::{Catalog, ColumnInfo};
use crate::types::{NativeTypeSpec, SemanticType};

use super::{DdlStyle, DialectProfile};

pub(super) fn profile() -> DialectProfile {
    DialectProfile::new(
        "sqlite",
        "integer primary key autoincrement",
        '"',
        DdlStyle::Sqlite,
    )
    .with_type(SemanticType::Boolean, NativeTypeSpec::new("boolean"))
    .with_type(SemanticType::Integer, NativeTypeSpec::new("integer"))
    .with_type(SemanticType::String, NativeTypeSpec::new("varchar").size(255))
    .with_type(SemanticType::Password, NativeTypeSpec::new("varchar").size(255))
    .with_type(SemanticType::Double, NativeTypeSpec::new("double"))
    .with_type(SemanticType::Float, NativeTypeSpec::new("float"))
    .with_type(SemanticType::Money, NativeTypeSpec::new("float"))
    .with_type(SemanticType::Date, NativeTypeSpec::new("date"))
    .with_type(SemanticType::DateTime, NativeTypeSpec::new("datetime"))
    .with_type(SemanticType::Time, NativeTypeSpec::new("time"))
    .with_type(SemanticType::Text, NativeTypeSpec::new("text"))
    .with_type(SemanticType::Array, NativeTypeSpec::new("text"))
    .with_type(SemanticType::Object, NativeTypeSpec::new("text"))
    .with_default(SemanticType::Text)
}

/// Describes SQLite tables with `pragma table_info`.
///
/// A missing table yields an empty result, so no separate existence check
/// is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePragma;

impl Catalog for SqlitePragma {
    fn existence_query(&self, _profile: &DialectProfile, _table: &str) -> Option<String> {
        None
    }

    fn describe_query(&self, profile: &DialectProfile, table: &str) -> String {
        format!("pragma table_info({})", profile.quote(table))
    }

    fn column_from_row(&self, table: &str, row: &Row) -> Result<ColumnInfo> {
        let malformed = |column| SchemaError::MalformedCatalogRow {
            table: table.to_string(),
            column,
        };
        let name = row.text("name").ok_or_else(|| malformed("name"))?;
        // Columns declared without a type report an empty string.
        let native_type = row.text("type").unwrap_or_default();
        let pk = row.integer("pk").ok_or_else(|| malformed("pk"))?;

        Ok(ColumnInfo::new(name, native_type, pk != 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_query() {
        let profile = profile();
        assert_eq!(
            SqlitePragma.describe_query(&profile, "user"),
            "pragma table_info(\"user\")"
        );
        assert_eq!(SqlitePragma.existence_query(&profile, "user"), None);
    }

    #[test]
    fn test_column_from_row() {
        let row = Row::new()
            .with("cid", 0_i64)
            .with("name", "id")
            .with("type", "INTEGER")
            .with("notnull", 0_i64)
            .with("pk", 1_i64);
        let col = SqlitePragma.column_from_row("user", &row).unwrap();
        assert_eq!(col, ColumnInfo::new("id", "INTEGER", true));

        let row = Row::new()
            .with("name", "email")
            .with("type", "varchar(255)")
            .with("pk", 0_i64);
        let col = SqlitePragma.column_from_row("user", &row).unwrap();
        assert!(!col.primary_key);
        assert_eq!(col.native_type, "varchar(255)");
    }

    #[test]
    fn test_column_from_row_missing_pk() {
        let row = Row::new().with("name", "email").with("type", "text");
        assert!(matches!(
            SqlitePragma.column_from_row("user", &row),
            Err(SchemaError::MalformedCatalogRow { column: "pk", .. })
        ));
    }
}
