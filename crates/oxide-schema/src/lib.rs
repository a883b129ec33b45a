//! Schema reconciliation over sqlx.
//!
//! This crate connects [`oxide_schema_core`] to real databases: a pooled
//! [`SqlxConnection`](connection::SqlxConnection) for SQLite and MySQL, and
//! JSON [`SchemaFile`](config::SchemaFile)s describing the desired tables.
//! The `oxide-schema` binary drives both from the command line.
//!
//! ```rust,no_run
//! use oxide_schema::prelude::*;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let migrator = Migrator::new(SqlxConnection::connect("sqlite:app.db").await?);
//! for builder in SchemaFile::load("schema.json")?.builders(None)? {
//!     let desired = migrator.desired(&builder)?;
//!     let result = migrator.migrate(&desired, false).await?;
//!     println!("{}", result.report().simple());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;

pub use oxide_schema_core;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ConfigError, SchemaFile};
    pub use crate::connection::SqlxConnection;
    pub use oxide_schema_core::prelude::*;
}
