//! Migration runner.
//!
//! The [`Migrator`] ties the pieces together for one connection: it
//! introspects the live table, diffs it against the desired snapshot, and
//! either executes the rendered DDL or, in dry-run mode, leaves the
//! database alone so the caller can print the report.

use tracing::{debug, info, warn};

use crate::builder::SchemaBuilder;
use crate::connection::Connection;
use crate::dialect::DialectProfile;
use crate::diff::{diff, DiffMode, SchemaDiff};
use crate::error::Result;
use crate::introspect::describe_table;
use crate::render::{Renderer, Statement};
use crate::snapshot::SchemaSnapshot;

/// Reconciles tables on one connection.
pub struct Migrator<C: Connection> {
    conn: C,
    profile: DialectProfile,
}

impl<C: Connection> Migrator<C> {
    /// Creates a migrator using the built-in profile of the connection's dialect.
    pub fn new(conn: C) -> Self {
        let profile = conn.dialect().profile();
        Self { conn, profile }
    }

    /// Creates a migrator with a custom profile.
    ///
    /// Fails if the profile's default semantic type has no native mapping.
    pub fn with_profile(conn: C, profile: DialectProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self { conn, profile })
    }

    /// Returns the connection.
    #[must_use]
    pub fn connection(&self) -> &C {
        &self.conn
    }

    /// Returns the active profile.
    #[must_use]
    pub fn profile(&self) -> &DialectProfile {
        &self.profile
    }

    /// Returns a renderer for the active profile.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.profile)
    }

    /// Resolves a desired table definition against the active profile.
    pub fn desired(&self, builder: &SchemaBuilder) -> Result<SchemaSnapshot> {
        builder.build(&self.profile)
    }

    /// Reads the live table, `None` if it does not exist.
    pub async fn describe(&self, table: &str) -> Result<Option<SchemaSnapshot>> {
        let catalog = self.conn.dialect().catalog();
        match describe_table(&self.conn, catalog, &self.profile, table).await? {
            Some(columns) => SchemaSnapshot::from_columns(table, &columns, &self.profile).map(Some),
            None => Ok(None),
        }
    }

    /// Compares the desired snapshot with the live table.
    pub async fn diff(&self, desired: &SchemaSnapshot) -> Result<SchemaDiff> {
        let actual = self.describe(desired.table()).await?;
        Ok(diff(desired, actual.as_ref()))
    }

    /// Returns the statements that applying `diff` would run.
    pub fn sql_for(&self, diff: &SchemaDiff, desired: &SchemaSnapshot) -> Result<Vec<String>> {
        let renderer = self.renderer();
        match diff.mode() {
            DiffMode::Create => renderer.statements(&Statement::Create(desired)),
            DiffMode::Alter if diff.operations().is_empty() => Ok(Vec::new()),
            DiffMode::Alter => renderer.statements(&Statement::Alter {
                table: desired.table(),
                operations: diff.operations(),
            }),
        }
    }

    /// Brings the live table in line with `desired`.
    ///
    /// With `dry_run` nothing is executed; the returned diff carries the
    /// report either way.
    pub async fn migrate(&self, desired: &SchemaSnapshot, dry_run: bool) -> Result<SchemaDiff> {
        info!(table = desired.table(), dry_run, "Migrating table");

        let diff = self.diff(desired).await?;
        let statements = self.sql_for(&diff, desired)?;

        if statements.is_empty() {
            info!(table = desired.table(), "No changes");
        } else if dry_run {
            for sql in &statements {
                debug!(sql = %sql, "Dry run, not executing");
            }
        } else {
            let summary = self.run(&statements).await?;
            if summary.executed == 0 {
                warn!(
                    table = desired.table(),
                    skipped = summary.skipped,
                    "No statements executed, remaining changes need a manual migration"
                );
            } else {
                info!(
                    table = desired.table(),
                    executed = summary.executed,
                    skipped = summary.skipped,
                    added = diff.report().added().len(),
                    altered = diff.report().altered().len(),
                    dropped = diff.report().dropped().len(),
                    "Table migrated"
                );
            }
        }

        Ok(diff)
    }

    /// Creates the table described by `desired`.
    pub async fn create(&self, desired: &SchemaSnapshot) -> Result<()> {
        let statements = self.renderer().statements(&Statement::Create(desired))?;
        self.run(&statements).await.map(|_| ())
    }

    /// Drops a table if it exists.
    pub async fn drop(&self, table: &str) -> Result<()> {
        let statements = self.renderer().statements(&Statement::Drop { table })?;
        self.run(&statements).await.map(|_| ())
    }

    /// Renames a table.
    pub async fn rename(&self, from: &str, to: &str) -> Result<()> {
        let statements = self.renderer().statements(&Statement::Rename { from, to })?;
        self.run(&statements).await.map(|_| ())
    }

    async fn run(&self, statements: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for sql in statements {
            if sql.starts_with("--") {
                warn!(comment = %sql, "Skipping comment (unsupported operation)");
                summary.skipped += 1;
                continue;
            }
            debug!(sql = %sql, "Executing SQL");
            self.conn.execute(sql).await?;
            summary.executed += 1;
        }
        Ok(summary)
    }
}

/// Statements actually sent versus skipped comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunSummary {
    executed: usize,
    skipped: usize,
}
