//! Semantic and native column types.
//!
//! A [`SemanticType`] is what a schema author asks for ("a string", "a
//! datetime"). A [`NativeTypeSpec`] is how one database engine spells it.
//! The mapping between the two lives in a
//! [`DialectProfile`](crate::dialect::DialectProfile).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Dialect-independent field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// True/false flag.
    Boolean,
    /// Whole number.
    Integer,
    /// Short string.
    String,
    /// Password hash, stored like a string.
    Password,
    /// Double precision number.
    Double,
    /// Single precision number.
    Float,
    /// Monetary amount.
    Money,
    /// Calendar date.
    Date,
    /// Date and time.
    #[serde(rename = "datetime")]
    DateTime,
    /// Time of day.
    Time,
    /// Unbounded text.
    Text,
    /// Serialized list.
    Array,
    /// Serialized structure.
    Object,
}

impl SemanticType {
    /// Every semantic type, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Boolean,
        Self::Integer,
        Self::String,
        Self::Password,
        Self::Double,
        Self::Float,
        Self::Money,
        Self::Date,
        Self::DateTime,
        Self::Time,
        Self::Text,
        Self::Array,
        Self::Object,
    ];

    /// Returns the lowercase name used in schema files.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Password => "password",
            Self::Double => "double",
            Self::Float => "float",
            Self::Money => "money",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Text => "text",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == wanted)
            .ok_or_else(|| SchemaError::UnknownSemanticType(s.to_string()))
    }
}

/// Length or precision attached to a native type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeLength {
    /// Character or display width, e.g. `varchar(255)`.
    Size(u32),
    /// Precision and scale, e.g. `decimal(18,6)`.
    Precision {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
}

impl fmt::Display for TypeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(size) => write!(f, "{size}"),
            Self::Precision { precision, scale } => write!(f, "{precision},{scale}"),
        }
    }
}

/// A dialect-specific rendering of a semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeTypeSpec {
    /// Native type name, lowercase (e.g. `varchar`).
    pub name: String,
    /// Optional length or precision.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub length: Option<TypeLength>,
}

impl NativeTypeSpec {
    /// Creates a native type without a length.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            length: None,
        }
    }

    /// Sets a character/display width.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.length = Some(TypeLength::Size(size));
        self
    }

    /// Sets precision and scale.
    #[must_use]
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.length = Some(TypeLength::Precision { precision, scale });
        self
    }

    /// Returns true if both specs share the same type name, ignoring length.
    #[must_use]
    pub fn same_name(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for NativeTypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.length {
            Some(length) => write!(f, "{}({length})", self.name),
            None => f.write_str(&self.name),
        }
    }
}
