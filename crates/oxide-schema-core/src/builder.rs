//! Desired schema construction.
//!
//! Callers describe the table they want as `(name, semantic type)` pairs,
//! either directly through [`SchemaBuilder`] or through any type
//! implementing [`DesiredSchemaProvider`]. The builder resolves the types
//! against a dialect and produces a [`SchemaSnapshot`] comparable with
//! the introspected one.

use serde::{Deserialize, Serialize};

use crate::dialect::DialectProfile;
use crate::error::{Result, SchemaError};
use crate::snapshot::{FieldSpec, SchemaSnapshot};
use crate::transcode::Transcoder;
use crate::types::SemanticType;

/// Primary key name used when none is given.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// One field as supplied by a desired-schema provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredField {
    /// Field name.
    pub name: String,
    /// Requested semantic type.
    pub semantic: SemanticType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
}

impl DesiredField {
    /// Creates a regular field.
    #[must_use]
    pub fn new(name: impl Into<String>, semantic: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic,
            primary_key: false,
        }
    }

    /// Creates a primary key field.
    #[must_use]
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name, SemanticType::Integer)
        }
    }
}

/// Anything that can enumerate the fields a table should have.
pub trait DesiredSchemaProvider {
    /// Returns the table name.
    fn table_name(&self) -> &str;

    /// Returns the fields in declaration order.
    fn fields(&self) -> Result<Vec<DesiredField>>;
}

/// Accumulates a desired table definition.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    table: String,
    primary_key: String,
    fields: Vec<(String, SemanticType)>,
}

impl SchemaBuilder {
    /// Starts a table definition with the conventional `id` primary key.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            fields: Vec::new(),
        }
    }

    /// Starts a table definition from a provider.
    pub fn from_provider(provider: &impl DesiredSchemaProvider) -> Result<Self> {
        let mut builder = Self::new(provider.table_name());
        let mut primary_seen = false;
        for field in provider.fields()? {
            if field.primary_key {
                if primary_seen {
                    return Err(SchemaError::MultiplePrimaryKeys {
                        table: builder.table,
                    });
                }
                primary_seen = true;
                builder = builder.primary_key(field.name);
            } else {
                builder = builder.field(field.name, field.semantic);
            }
        }
        Ok(builder)
    }

    /// Overrides the primary key name.
    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, semantic: SemanticType) -> Self {
        self.fields.push((name.into(), semantic));
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolves the definition against a dialect.
    ///
    /// The primary key is typed as the dialect's integer and always comes
    /// first.
    pub fn build(&self, profile: &DialectProfile) -> Result<SchemaSnapshot> {
        let transcoder = Transcoder::new(profile);
        let mut snapshot = SchemaSnapshot::new(&self.table);
        snapshot.insert(FieldSpec::primary(
            &self.primary_key,
            transcoder.to_native(SemanticType::Integer)?,
        ))?;
        for (name, semantic) in &self.fields {
            snapshot.insert(FieldSpec::new(name, transcoder.to_native(*semantic)?))?;
        }
        Ok(snapshot)
    }
}

/// A table definition loaded from a schema file.
///
/// ```json
/// {
///   "table": "user",
///   "fields": [
///     { "name": "name", "type": "string" },
///     { "name": "created_dts", "type": "datetime" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name.
    pub table: String,
    /// Primary key name, `id` if omitted and no field is flagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// Field definitions in order.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A field entry of a [`TableDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name.
    pub name: String,
    /// Semantic type name.
    #[serde(rename = "type", default = "default_field_type")]
    pub semantic: String,
    /// Marks this field as the primary key.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
}

fn default_field_type() -> String {
    SemanticType::String.as_str().to_string()
}

impl DesiredSchemaProvider for TableDefinition {
    fn table_name(&self) -> &str {
        &self.table
    }

    fn fields(&self) -> Result<Vec<DesiredField>> {
        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        if let Some(pk) = &self.primary_key {
            fields.push(DesiredField::primary(pk));
        }
        for def in &self.fields {
            if def.primary_key {
                fields.push(DesiredField::primary(&def.name));
            } else {
                fields.push(DesiredField::new(&def.name, def.semantic.parse()?));
            }
        }
        Ok(fields)
    }
}
