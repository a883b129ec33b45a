//! MySQL profile and catalog.

use crate::connection::Row;
use crate::error::{Result, SchemaError};
use crate::introspect::{string_literal, Catalog, ColumnInfo};
use crate::types::{NativeTypeSpec, SemanticType};

use super::{DdlStyle, DialectProfile};

pub(super) fn profile() -> DialectProfile {
    DialectProfile::new(
        "mysql",
        "integer primary key auto_increment",
        '`',
        DdlStyle::Combined,
    )
    .with_type(SemanticType::Boolean, NativeTypeSpec::new("tinyint").size(1))
    .with_type(SemanticType::Integer, NativeTypeSpec::new("int").size(11))
    .with_type(SemanticType::String, NativeTypeSpec::new("varchar").size(255))
    .with_type(SemanticType::Password, NativeTypeSpec::new("varchar").size(255))
    .with_type(SemanticType::Double, NativeTypeSpec::new("decimal").precision(18, 6))
    .with_type(SemanticType::Float, NativeTypeSpec::new("float"))
    .with_type(SemanticType::Money, NativeTypeSpec::new("float"))
    .with_type(SemanticType::Date, NativeTypeSpec::new("date"))
    .with_type(SemanticType::DateTime, NativeTypeSpec::new("datetime"))
    .with_type(SemanticType::Time, NativeTypeSpec::new("time"))
    .with_type(SemanticType::Text, NativeTypeSpec::new("text"))
    .with_type(SemanticType::Array, NativeTypeSpec::new("text"))
    .with_type(SemanticType::Object, NativeTypeSpec::new("text"))
    .with_native_alias(NativeTypeSpec::new("timestamp"))
    .with_native_alias(NativeTypeSpec::new("blob"))
    .with_default(SemanticType::Text)
}

/// Describes MySQL tables with `show tables like` and `describe`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDescribe;

impl Catalog for MySqlDescribe {
    fn existence_query(&self, _profile: &DialectProfile, table: &str) -> Option<String> {
        // `_` and `%` are LIKE wildcards; match the name literally.
        let pattern = table.replace('_', "\\_").replace('%', "\\%");
        Some(format!("show tables like {}", string_literal(&pattern)))
    }

    fn describe_query(&self, profile: &DialectProfile, table: &str) -> String {
        format!("describe {}", profile.quote(table))
    }

    fn column_from_row(&self, table: &str, row: &Row) -> Result<ColumnInfo> {
        let malformed = |column| SchemaError::MalformedCatalogRow {
            table: table.to_string(),
            column,
        };
        let name = row.text("Field").ok_or_else(|| malformed("Field"))?;
        let native_type = row.text("Type").ok_or_else(|| malformed("Type"))?;
        let primary_key = row.text("Key") == Some("PRI");

        Ok(ColumnInfo::new(name, native_type, primary_key))
    }
}
