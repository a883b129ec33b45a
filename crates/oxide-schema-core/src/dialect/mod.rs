//! Dialect profiles.
//!
//! A [`DialectProfile`] is the constant data one database engine needs:
//! how to declare the primary key, how to escape identifiers, how its DDL
//! is shaped and which native type stands for each [`SemanticType`].
//! Profiles are plain values, so several dialects can coexist in one
//! process and custom ones can be assembled for tests.

mod mysql;
mod sqlite;

pub use mysql::MySqlDescribe;
pub use sqlite::SqlitePragma;

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SchemaError};
use crate::introspect::Catalog;
use crate::types::{NativeTypeSpec, SemanticType};

/// How a dialect shapes ALTER and RENAME statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlStyle {
    /// One `alter table` carrying comma-joined clauses, `rename table a to b`.
    Combined,
    /// One `alter table` per clause, `alter table a rename to b`, and no
    /// in-place column type change.
    Sqlite,
}

/// Per-engine constants used by the transcoder, introspector and renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    name: String,
    primary_key_fragment: String,
    escape_char: char,
    ddl_style: DdlStyle,
    types: Vec<(SemanticType, NativeTypeSpec)>,
    native_aliases: Vec<NativeTypeSpec>,
    default_semantic: SemanticType,
}

impl DialectProfile {
    /// Creates an empty profile. Add type mappings with [`with_type`](Self::with_type).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        primary_key_fragment: impl Into<String>,
        escape_char: char,
        ddl_style: DdlStyle,
    ) -> Self {
        Self {
            name: name.into(),
            primary_key_fragment: primary_key_fragment.into(),
            escape_char,
            ddl_style,
            types: Vec::new(),
            native_aliases: Vec::new(),
            default_semantic: SemanticType::Text,
        }
    }

    /// Maps a semantic type to a native type, replacing any earlier mapping
    /// for the same semantic type in place.
    #[must_use]
    pub fn with_type(mut self, semantic: SemanticType, native: NativeTypeSpec) -> Self {
        match self.types.iter_mut().find(|(ty, _)| *ty == semantic) {
            Some(entry) => entry.1 = native,
            None => self.types.push((semantic, native)),
        }
        self
    }

    /// Registers a native type that has no semantic counterpart.
    ///
    /// Introspected columns of this type keep it instead of collapsing to
    /// the default, so they still compare unequal to every desired type.
    #[must_use]
    pub fn with_native_alias(mut self, native: NativeTypeSpec) -> Self {
        if !self.native_aliases.iter().any(|n| n.same_name(&native)) {
            self.native_aliases.push(native);
        }
        self
    }

    /// Sets the semantic type used for native types the profile does not know.
    #[must_use]
    pub fn with_default(mut self, semantic: SemanticType) -> Self {
        self.default_semantic = semantic;
        self
    }

    /// Checks that the default semantic type has a native mapping.
    pub fn validate(&self) -> Result<()> {
        if self.types.iter().any(|(ty, _)| *ty == self.default_semantic) {
            Ok(())
        } else {
            Err(SchemaError::UnknownSemanticType(
                self.default_semantic.to_string(),
            ))
        }
    }

    /// Returns the profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column definition used for the primary key.
    #[must_use]
    pub fn primary_key_fragment(&self) -> &str {
        &self.primary_key_fragment
    }

    /// Returns the identifier escape character.
    #[must_use]
    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    /// Returns the DDL shape of this dialect.
    #[must_use]
    pub fn ddl_style(&self) -> DdlStyle {
        self.ddl_style
    }

    /// Returns the semantic-to-native table in declaration order.
    #[must_use]
    pub fn types(&self) -> &[(SemanticType, NativeTypeSpec)] {
        &self.types
    }

    /// Returns the native-only types.
    #[must_use]
    pub fn native_aliases(&self) -> &[NativeTypeSpec] {
        &self.native_aliases
    }

    /// Returns the fallback semantic type.
    #[must_use]
    pub fn default_semantic(&self) -> SemanticType {
        self.default_semantic
    }

    /// Wraps an identifier in the escape character, doubling any embedded one.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        let esc = self.escape_char;
        let escaped = identifier.replace(esc, &format!("{esc}{esc}"));
        format!("{esc}{escaped}{esc}")
    }
}

/// The database engines with a built-in profile and catalog strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// SQLite.
    Sqlite,
    /// MySQL and MariaDB.
    MySql,
}

impl DialectKind {
    /// Detects the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        scheme
            .parse()
            .map_err(|_| SchemaError::UnsupportedDialect(url.to_string()))
    }

    /// Returns the built-in profile for this engine.
    #[must_use]
    pub fn profile(self) -> DialectProfile {
        match self {
            Self::Sqlite => sqlite::profile(),
            Self::MySql => mysql::profile(),
        }
    }

    /// Returns the catalog strategy used to describe live tables.
    #[must_use]
    pub fn catalog(self) -> &'static dyn Catalog {
        match self {
            Self::Sqlite => &SqlitePragma,
            Self::MySql => &MySqlDescribe,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
        })
    }
}

impl FromStr for DialectKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::MySql),
            _ => Err(SchemaError::UnsupportedDialect(s.to_string())),
        }
    }
}
