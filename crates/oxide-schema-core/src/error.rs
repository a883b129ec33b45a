//! Error types for schema reconciliation.

/// Boxed error produced by a database driver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building, diffing or applying a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A semantic type is unknown or has no mapping in the active dialect.
    #[error("Unknown semantic type '{0}'")]
    UnknownSemanticType(String),

    /// The same field name was registered twice for one table.
    #[error("Field alias '{alias}' is already defined on table '{table}'")]
    DuplicateFieldAlias {
        /// Table being built.
        table: String,
        /// The repeated field name.
        alias: String,
    },

    /// More than one field was marked as the primary key.
    #[error("Table '{table}' declares more than one primary key field")]
    MultiplePrimaryKeys {
        /// Table being built.
        table: String,
    },

    /// A create or alter statement was requested without any fields.
    #[error("No fields defined for table '{table}'")]
    NoFieldsDefined {
        /// Table being rendered.
        table: String,
    },

    /// A render mode name was not recognised.
    #[error("Structure builder does not have mode '{0}'")]
    UnsupportedMode(String),

    /// A connection URL or driver name does not match a known dialect.
    #[error("Unsupported database dialect '{0}'")]
    UnsupportedDialect(String),

    /// A catalog row did not carry a column the introspector relies on.
    #[error("Catalog row for table '{table}' is missing column '{column}'")]
    MalformedCatalogRow {
        /// Table being described.
        table: String,
        /// The missing or mistyped column.
        column: &'static str,
    },

    /// The database connection could not be established or was lost.
    #[error("Connection failure: {0}")]
    Connection(#[source] BoxError),

    /// A statement failed on the database.
    #[error("Query failed: {sql}")]
    Query {
        /// The statement that failed.
        sql: String,
        /// Driver error.
        #[source]
        source: BoxError,
    },
}

impl SchemaError {
    /// Wraps a driver error raised while running `sql`.
    pub fn query(sql: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Query {
            sql: sql.into(),
            source: source.into(),
        }
    }
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
