//! Desired-vs-actual diffing.
//!
//! [`diff`] walks the desired snapshot once, then the actual one, and
//! classifies every field as added, altered, dropped or unchanged. The
//! [`MigrationReport`] is filled in during the same walk so the operation
//! list and the report cannot disagree.
//!
//! Only native type *names* are compared: `varchar(64)` and `varchar(255)`
//! count as the same type. The primary key is never altered or dropped.

use serde::Serialize;
use tracing::debug;

use crate::report::MigrationReport;
use crate::snapshot::SchemaSnapshot;
use crate::types::NativeTypeSpec;

/// A single column-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MigrationOperation {
    /// Add a missing column.
    AddField {
        /// Column name.
        name: String,
        /// Type of the new column.
        native_type: NativeTypeSpec,
    },
    /// Change the type of an existing column.
    AlterField {
        /// Column name.
        name: String,
        /// Type currently in the database.
        old_type: NativeTypeSpec,
        /// Desired type.
        new_type: NativeTypeSpec,
    },
    /// Remove a column no longer desired.
    DropField {
        /// Column name.
        name: String,
    },
}

impl MigrationOperation {
    /// Returns the column this operation touches.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AddField { name, .. }
            | Self::AlterField { name, .. }
            | Self::DropField { name } => name,
        }
    }
}

/// Whether the table has to be created or altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    /// The table does not exist yet.
    Create,
    /// The table exists; apply the operations.
    Alter,
}

/// The outcome of comparing a desired snapshot with the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiff {
    mode: DiffMode,
    operations: Vec<MigrationOperation>,
    report: MigrationReport,
}

impl SchemaDiff {
    /// Returns the diff mode.
    #[must_use]
    pub fn mode(&self) -> DiffMode {
        self.mode
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.report.table()
    }

    /// Returns the column operations, empty in create mode.
    #[must_use]
    pub fn operations(&self) -> &[MigrationOperation] {
        &self.operations
    }

    /// Returns the report built alongside the operations.
    #[must_use]
    pub fn report(&self) -> &MigrationReport {
        &self.report
    }

    /// Returns true if nothing needs to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mode == DiffMode::Alter && self.operations.is_empty()
    }
}

/// Compares `desired` with `actual`, where `None` means the table is missing.
///
/// Add and alter operations follow the desired field order; drop operations
/// follow the actual field order and come after them.
#[must_use]
pub fn diff(desired: &SchemaSnapshot, actual: Option<&SchemaSnapshot>) -> SchemaDiff {
    let mut report = MigrationReport::new(desired.table());

    let Some(actual) = actual else {
        for field in desired.fields() {
            report.record_added(field.clone());
        }
        debug!(table = desired.table(), "Table missing, will create");
        return SchemaDiff {
            mode: DiffMode::Create,
            operations: Vec::new(),
            report,
        };
    };

    let is_primary = |name: &str| desired.is_primary_key(name) || actual.is_primary_key(name);
    let mut operations = Vec::new();

    for field in desired.fields() {
        if is_primary(&field.name) {
            continue;
        }
        match actual.field(&field.name) {
            Some(existing) if existing.native_type.same_name(&field.native_type) => {}
            Some(existing) => {
                debug!(
                    table = desired.table(),
                    field = %field.name,
                    from = %existing.native_type,
                    to = %field.native_type,
                    "Field type changed"
                );
                operations.push(MigrationOperation::AlterField {
                    name: field.name.clone(),
                    old_type: existing.native_type.clone(),
                    new_type: field.native_type.clone(),
                });
                report.record_altered(
                    &field.name,
                    existing.native_type.clone(),
                    field.native_type.clone(),
                );
            }
            None => {
                debug!(table = desired.table(), field = %field.name, "Field added");
                operations.push(MigrationOperation::AddField {
                    name: field.name.clone(),
                    native_type: field.native_type.clone(),
                });
                report.record_added(field.clone());
            }
        }
    }

    for field in actual.fields() {
        if is_primary(&field.name) || desired.field(&field.name).is_some() {
            continue;
        }
        debug!(table = desired.table(), field = %field.name, "Field dropped");
        operations.push(MigrationOperation::DropField {
            name: field.name.clone(),
        });
        report.record_dropped(field.clone());
    }

    SchemaDiff {
        mode: DiffMode::Alter,
        operations,
        report,
    }
}
