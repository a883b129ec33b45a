//! Normalized table snapshots.
//!
//! Both sides of a diff are [`SchemaSnapshot`]s expressed in the same
//! dialect vocabulary: the desired side comes from the
//! [`SchemaBuilder`](crate::builder::SchemaBuilder), the actual side from
//! [`SchemaSnapshot::from_columns`] over introspected columns.

use indexmap::IndexMap;
use serde::Serialize;

use crate::dialect::DialectProfile;
use crate::error::{Result, SchemaError};
use crate::introspect::ColumnInfo;
use crate::transcode::Transcoder;
use crate::types::NativeTypeSpec;

/// A single field of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Native type in the dialect's vocabulary.
    pub native_type: NativeTypeSpec,
    /// Whether this is the primary key.
    pub primary_key: bool,
}

impl FieldSpec {
    /// Creates a regular field.
    #[must_use]
    pub fn new(name: impl Into<String>, native_type: NativeTypeSpec) -> Self {
        Self {
            name: name.into(),
            native_type,
            primary_key: false,
        }
    }

    /// Creates a primary key field.
    #[must_use]
    pub fn primary(name: impl Into<String>, native_type: NativeTypeSpec) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name, native_type)
        }
    }
}

/// The fields of one table at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    table: String,
    fields: IndexMap<String, FieldSpec>,
}

impl SchemaSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builds the actual-side snapshot from introspected columns.
    ///
    /// Native types are normalized through the profile so that a live
    /// `VARCHAR(100)` compares as the profile's own `varchar(255)`.
    pub fn from_columns(
        table: impl Into<String>,
        columns: &[ColumnInfo],
        profile: &DialectProfile,
    ) -> Result<Self> {
        let transcoder = Transcoder::new(profile);
        let mut snapshot = Self::new(table);
        for column in columns {
            let native = transcoder.normalize(&column.native_type);
            let field = if column.primary_key {
                FieldSpec::primary(&column.name, native)
            } else {
                FieldSpec::new(&column.name, native)
            };
            snapshot.insert(field)?;
        }
        Ok(snapshot)
    }

    /// Adds a field. Names must be unique; a primary key goes first.
    pub fn insert(&mut self, field: FieldSpec) -> Result<()> {
        if self.fields.contains_key(&field.name) {
            return Err(SchemaError::DuplicateFieldAlias {
                table: self.table.clone(),
                alias: field.name,
            });
        }
        if field.primary_key {
            self.fields.shift_insert(0, field.name.clone(), field);
        } else {
            self.fields.insert(field.name.clone(), field);
        }
        Ok(())
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterates over the fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// Returns the primary key field, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&FieldSpec> {
        self.fields.values().find(|f| f.primary_key)
    }

    /// Returns true if `name` is a primary key field in this snapshot.
    #[must_use]
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|f| f.primary_key)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the snapshot has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
