//! Desired-vs-actual table schema reconciliation.
//!
//! `oxide-schema-core` compares the table you want with the table the
//! database has and works out the column operations in between:
//!
//! - **Dialect profiles** - per-engine type tables, primary key DDL and
//!   identifier escaping (SQLite, MySQL)
//! - **Transcoder** - semantic types to native types and back, with a total
//!   fallback for types the profile does not know
//! - **Introspection** - catalog queries describing a live table
//! - **Diff** - add/alter/drop classification that never touches the
//!   primary key
//! - **Renderer** - `create`/`alter`/`drop`/`rename` DDL per dialect
//! - **Report** - simple, detailed or structured summaries for dry runs
//!
//! The crate is driver-agnostic; `oxide-schema` provides a sqlx-backed
//! [`Connection`](connection::Connection).
//!
//! # Example
//!
//! ```rust
//! use oxide_schema_core::prelude::*;
//!
//! let profile = DialectKind::Sqlite.profile();
//! let desired = SchemaBuilder::new("user")
//!     .field("name", SemanticType::String)
//!     .field("email", SemanticType::String)
//!     .build(&profile)
//!     .unwrap();
//!
//! // The table does not exist yet.
//! let result = diff(&desired, None);
//! assert_eq!(result.mode(), DiffMode::Create);
//!
//! let sql = Renderer::new(&profile)
//!     .render(&Statement::Create(&desired))
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "create table \"user\" (\"id\" integer primary key autoincrement, \
//!      \"name\" varchar(255), \"email\" varchar(255))"
//! );
//! ```

pub mod builder;
pub mod connection;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod introspect;
pub mod migrator;
pub mod render;
pub mod report;
pub mod snapshot;
pub mod transcode;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::builder::{
        DesiredField, DesiredSchemaProvider, FieldDefinition, SchemaBuilder, TableDefinition,
    };
    pub use crate::connection::{Connection, Row, Value};
    pub use crate::dialect::{DdlStyle, DialectKind, DialectProfile};
    pub use crate::diff::{diff, DiffMode, MigrationOperation, SchemaDiff};
    pub use crate::error::{Result, SchemaError};
    pub use crate::introspect::{describe_table, Catalog, ColumnInfo};
    pub use crate::migrator::Migrator;
    pub use crate::render::{RenderMode, Renderer, Statement};
    pub use crate::report::{MigrationReport, ReportFormat, ReportOutput, StructuredReport};
    pub use crate::snapshot::{FieldSpec, SchemaSnapshot};
    pub use crate::transcode::Transcoder;
    pub use crate::types::{NativeTypeSpec, SemanticType, TypeLength};
}
