//! DDL statement rendering.
//!
//! Rendering is purely textual: a [`Renderer`] turns a [`Statement`] into
//! SQL for one dialect without touching a connection. Execution is the
//! [`Migrator`](crate::migrator::Migrator)'s job.

use std::fmt;
use std::str::FromStr;

use crate::dialect::{DdlStyle, DialectProfile};
use crate::diff::MigrationOperation;
use crate::error::{Result, SchemaError};
use crate::snapshot::{FieldSpec, SchemaSnapshot};
use crate::types::NativeTypeSpec;

/// The kind of statement to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `create table`.
    Create,
    /// `alter table`.
    Alter,
    /// `drop table if exists`.
    Drop,
    /// Rename a table.
    Rename,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Alter => "alter",
            Self::Drop => "drop",
            Self::Rename => "rename",
        })
    }
}

impl FromStr for RenderMode {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "alter" => Ok(Self::Alter),
            "drop" => Ok(Self::Drop),
            "rename" => Ok(Self::Rename),
            _ => Err(SchemaError::UnsupportedMode(s.to_string())),
        }
    }
}

/// A table-level statement.
#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    /// Create the table described by a snapshot.
    Create(&'a SchemaSnapshot),
    /// Apply column operations to an existing table.
    Alter {
        /// Table name.
        table: &'a str,
        /// Operations in execution order.
        operations: &'a [MigrationOperation],
    },
    /// Drop a table if it exists.
    Drop {
        /// Table name.
        table: &'a str,
    },
    /// Rename a table.
    Rename {
        /// Current name.
        from: &'a str,
        /// New name.
        to: &'a str,
    },
}

impl Statement<'_> {
    /// Returns the mode of this statement.
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Create(_) => RenderMode::Create,
            Self::Alter { .. } => RenderMode::Alter,
            Self::Drop { .. } => RenderMode::Drop,
            Self::Rename { .. } => RenderMode::Rename,
        }
    }
}

/// Renders statements for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'p> {
    profile: &'p DialectProfile,
}

impl<'p> Renderer<'p> {
    /// Creates a renderer over `profile`.
    #[must_use]
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self { profile }
    }

    /// Renders a statement as one string, `";\n"`-separated when the
    /// dialect needs several statements.
    pub fn render(&self, statement: &Statement<'_>) -> Result<String> {
        Ok(self.statements(statement)?.join(";\n"))
    }

    /// Renders a statement as the list of SQL statements to execute.
    pub fn statements(&self, statement: &Statement<'_>) -> Result<Vec<String>> {
        match statement {
            Statement::Create(snapshot) => self.create_table(snapshot).map(|sql| vec![sql]),
            Statement::Alter { table, operations } => self.alter_table(table, operations),
            Statement::Drop { table } => Ok(vec![self.drop_table(table)]),
            Statement::Rename { from, to } => Ok(vec![self.rename_table(from, to)]),
        }
    }

    /// Generates `create table`, primary key first.
    pub fn create_table(&self, snapshot: &SchemaSnapshot) -> Result<String> {
        if snapshot.is_empty() {
            return Err(SchemaError::NoFieldsDefined {
                table: snapshot.table().to_string(),
            });
        }

        let primary = snapshot.fields().filter(|f| f.primary_key);
        let others = snapshot.fields().filter(|f| !f.primary_key);
        let defs: Vec<String> = primary
            .chain(others)
            .map(|field| self.field_definition(field))
            .collect();

        Ok(format!(
            "create table {} ({})",
            self.profile.quote(snapshot.table()),
            defs.join(", ")
        ))
    }

    /// Generates the `alter table` statement(s) for a list of operations.
    pub fn alter_table(&self, table: &str, operations: &[MigrationOperation]) -> Result<Vec<String>> {
        if operations.is_empty() {
            return Err(SchemaError::NoFieldsDefined {
                table: table.to_string(),
            });
        }

        let quoted = self.profile.quote(table);
        match self.profile.ddl_style() {
            DdlStyle::Combined => {
                let clauses: Vec<String> = operations.iter().map(|op| self.clause(op)).collect();
                Ok(vec![format!("alter table {quoted} {}", clauses.join(", "))])
            }
            DdlStyle::Sqlite => Ok(operations
                .iter()
                .map(|op| match op {
                    MigrationOperation::AlterField { name, new_type, .. } => format!(
                        "-- change column {}.{} to {new_type} needs a table rebuild on sqlite",
                        quoted,
                        self.profile.quote(name)
                    ),
                    _ => format!("alter table {quoted} {}", self.clause(op)),
                })
                .collect()),
        }
    }

    /// Generates `drop table if exists`.
    #[must_use]
    pub fn drop_table(&self, table: &str) -> String {
        format!("drop table if exists {}", self.profile.quote(table))
    }

    /// Generates a table rename.
    #[must_use]
    pub fn rename_table(&self, from: &str, to: &str) -> String {
        let (from, to) = (self.profile.quote(from), self.profile.quote(to));
        match self.profile.ddl_style() {
            DdlStyle::Combined => format!("rename table {from} to {to}"),
            DdlStyle::Sqlite => format!("alter table {from} rename to {to}"),
        }
    }

    fn clause(&self, operation: &MigrationOperation) -> String {
        match operation {
            MigrationOperation::DropField { name } => {
                format!("drop column {}", self.profile.quote(name))
            }
            MigrationOperation::AddField { name, native_type } => {
                format!("add column {}", self.column(name, native_type))
            }
            MigrationOperation::AlterField { name, new_type, .. } => format!(
                "change column {} {}",
                self.profile.quote(name),
                self.column(name, new_type)
            ),
        }
    }

    fn field_definition(&self, field: &FieldSpec) -> String {
        if field.primary_key {
            format!(
                "{} {}",
                self.profile.quote(&field.name),
                self.profile.primary_key_fragment()
            )
        } else {
            self.column(&field.name, &field.native_type)
        }
    }

    fn column(&self, name: &str, native_type: &NativeTypeSpec) -> String {
        format!("{} {native_type}", self.profile.quote(name))
    }
}
