//! Migration reports.
//!
//! A [`MigrationReport`] is produced by [`diff`](crate::diff::diff) and can
//! be rendered as a one-line summary, a detailed listing, or a structured
//! value for tooling. Rendering never touches the database.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::SchemaError;
use crate::snapshot::FieldSpec;
use crate::types::NativeTypeSpec;

const DETAIL_SEPARATOR: &str = "################################";

/// Old and new type of an altered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlteredField {
    /// Type currently in the database.
    pub old: NativeTypeSpec,
    /// Desired type.
    pub new: NativeTypeSpec,
}

/// What a diff found for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    table: String,
    added: IndexMap<String, FieldSpec>,
    altered: IndexMap<String, AlteredField>,
    dropped: IndexMap<String, FieldSpec>,
}

/// The report as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredReport {
    /// Added fields by name.
    pub added: IndexMap<String, FieldSpec>,
    /// Altered fields by name.
    pub altered: IndexMap<String, AlteredField>,
    /// Dropped fields by name.
    pub dropped: IndexMap<String, FieldSpec>,
}

/// How to render a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// No output.
    None,
    /// One-line summary.
    #[default]
    Simple,
    /// Multi-line listing.
    Detailed,
    /// Structured data.
    Structured,
}

impl FromStr for ReportFormat {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "simple" => Ok(Self::Simple),
            "detailed" | "detail" => Ok(Self::Detailed),
            "structured" | "array" => Ok(Self::Structured),
            _ => Err(SchemaError::UnsupportedMode(s.to_string())),
        }
    }
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutput {
    /// Nothing was requested.
    None,
    /// Simple or detailed text.
    Text(String),
    /// Structured data.
    Structured(StructuredReport),
}

impl fmt::Display for ReportOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Structured(report) => {
                let json = serde_json::to_string_pretty(report).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl MigrationReport {
    pub(crate) fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            added: IndexMap::new(),
            altered: IndexMap::new(),
            dropped: IndexMap::new(),
        }
    }

    pub(crate) fn record_added(&mut self, field: FieldSpec) {
        self.added.insert(field.name.clone(), field);
    }

    pub(crate) fn record_altered(&mut self, name: &str, old: NativeTypeSpec, new: NativeTypeSpec) {
        self.altered.insert(name.to_string(), AlteredField { old, new });
    }

    pub(crate) fn record_dropped(&mut self, field: FieldSpec) {
        self.dropped.insert(field.name.clone(), field);
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the added fields.
    #[must_use]
    pub fn added(&self) -> &IndexMap<String, FieldSpec> {
        &self.added
    }

    /// Returns the altered fields.
    #[must_use]
    pub fn altered(&self) -> &IndexMap<String, AlteredField> {
        &self.altered
    }

    /// Returns the dropped fields.
    #[must_use]
    pub fn dropped(&self) -> &IndexMap<String, FieldSpec> {
        &self.dropped
    }

    /// Returns true if anything was added, altered or dropped.
    #[must_use]
    pub fn changed(&self) -> bool {
        !(self.added.is_empty() && self.altered.is_empty() && self.dropped.is_empty())
    }

    /// Renders the report.
    #[must_use]
    pub fn report(&self, format: ReportFormat) -> ReportOutput {
        match format {
            ReportFormat::None => ReportOutput::None,
            ReportFormat::Simple => ReportOutput::Text(self.simple()),
            ReportFormat::Detailed => ReportOutput::Text(self.detailed()),
            ReportFormat::Structured => ReportOutput::Structured(self.structured()),
        }
    }

    /// One-line summary.
    #[must_use]
    pub fn simple(&self) -> String {
        let mut out = format!("ON TABLE : {} => ", self.table);
        if self.changed() {
            out.push_str(&format!(
                "added {}, altered {} and dropped {}",
                fields(self.added.len()),
                fields(self.altered.len()),
                fields(self.dropped.len()),
            ));
        } else {
            out.push_str("no changes");
        }
        out
    }

    /// Multi-line listing of every change.
    #[must_use]
    pub fn detailed(&self) -> String {
        let mut lines = vec![format!("TABLE : {}", self.table), DETAIL_SEPARATOR.to_string()];

        if !self.changed() {
            lines.push("no changes".to_string());
            return lines.join("\n");
        }

        lines.push(format!("ADDED ({})", self.added.len()));
        lines.extend(self.added.keys().cloned());

        lines.push(format!("ALTERED ({})", self.altered.len()));
        lines.extend(
            self.altered
                .iter()
                .map(|(name, change)| format!("{name} Type : {} => {}", change.old.name, change.new.name)),
        );

        lines.push(format!("DROPPED ({})", self.dropped.len()));
        lines.extend(self.dropped.keys().cloned());

        lines.join("\n")
    }

    /// Structured copy of the changes.
    #[must_use]
    pub fn structured(&self) -> StructuredReport {
        StructuredReport {
            added: self.added.clone(),
            altered: self.altered.clone(),
            dropped: self.dropped.clone(),
        }
    }
}

fn fields(count: usize) -> String {
    if count == 1 {
        "1 field".to_string()
    } else {
        format!("{count} fields")
    }
}
