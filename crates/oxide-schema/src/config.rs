//! Schema files.
//!
//! A schema file lists the desired tables as JSON:
//!
//! ```json
//! {
//!   "tables": [
//!     {
//!       "table": "user",
//!       "fields": [
//!         { "name": "name", "type": "string" },
//!         { "name": "email", "type": "string" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use oxide_schema_core::builder::{SchemaBuilder, TableDefinition};
use oxide_schema_core::error::SchemaError;

/// Errors raised while loading a schema file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read schema file '{path}': {source}")]
    Io {
        /// Path of the schema file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid schema JSON.
    #[error("Invalid schema file: {0}")]
    Json(#[from] serde_json::Error),

    /// The same table is defined twice.
    #[error("Table '{0}' is defined more than once")]
    DuplicateTable(String),

    /// A table definition is invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The requested table is not in the file.
    #[error("Table '{0}' is not defined in the schema file")]
    UnknownTable(String),
}

/// The desired tables of a schema file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Table definitions in file order.
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

impl SchemaFile {
    /// Reads and parses a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses schema JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let file: Self = serde_json::from_str(text)?;
        let mut seen = HashSet::new();
        for table in &file.tables {
            if !seen.insert(table.table.as_str()) {
                return Err(ConfigError::DuplicateTable(table.table.clone()));
            }
        }
        Ok(file)
    }

    /// Returns the builders for every table, or only `only` when given.
    pub fn builders(&self, only: Option<&str>) -> Result<Vec<SchemaBuilder>, ConfigError> {
        let tables: Vec<&TableDefinition> = match only {
            Some(name) => vec![self
                .tables
                .iter()
                .find(|t| t.table == name)
                .ok_or_else(|| ConfigError::UnknownTable(name.to_string()))?],
            None => self.tables.iter().collect(),
        };
        tables
            .into_iter()
            .map(|table| SchemaBuilder::from_provider(table).map_err(ConfigError::from))
            .collect()
    }
}
