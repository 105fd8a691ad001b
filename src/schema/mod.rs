//! Type schema loading
//!
//! The schema is supplied as a two-record CSV stream: the first record is
//! the ordered column names, the second the declared type names. Pairing
//! is positional and order is significant - the schema's column sequence
//! must match the data file's header exactly for a run to proceed.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};

/// Reserved column holding the member identifier, matched
/// case-insensitively against schema and header names.
pub const MEMBER_ID_COLUMN: &str = "MEMBER_ID";

/// Ordered column name to declared type name mapping
///
/// Declared types are kept as the raw strings from the type file so an
/// unrecognized name still reaches the validator, which owns the
/// "is not known type" diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    columns: Vec<(String, String)>,
}

impl TypeSchema {
    /// Load a schema from a reader over the type file
    ///
    /// Exactly two records are consumed; anything short of that is
    /// [`SchemaError::InvalidOrEmpty`], fatal for the whole run.
    pub fn load<R: Read>(reader: R) -> SchemaResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let names = match records.next() {
            Some(record) => record?,
            None => return Err(SchemaError::InvalidOrEmpty),
        };
        let types = match records.next() {
            Some(record) => record?,
            None => return Err(SchemaError::InvalidOrEmpty),
        };

        // Positional pairing; a ragged second record truncates to the
        // shorter side.
        let columns: Vec<(String, String)> = names
            .iter()
            .zip(types.iter())
            .map(|(name, declared)| (name.to_string(), declared.to_string()))
            .collect();

        if columns.is_empty() {
            return Err(SchemaError::InvalidOrEmpty);
        }

        Ok(Self { columns })
    }

    /// Load a schema from a type file on disk
    pub fn from_path(path: &Path) -> SchemaResult<Self> {
        let file = File::open(path)?;
        Self::load(file)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in schema order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// (column, declared type) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(|(name, declared)| (name.as_str(), declared.as_str()))
    }

    /// Declared type for a column, by exact (case-sensitive) name
    pub fn declared_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, declared)| declared.as_str())
    }

    /// The member-id column's name as spelled in the schema, if present
    pub fn member_id_column(&self) -> Option<&str> {
        self.column_names()
            .find(|name| name.eq_ignore_ascii_case(MEMBER_ID_COLUMN))
    }

    /// Full sequence-equality check against the data file's header:
    /// same names, same order, nothing missing, nothing extra.
    pub fn matches_headers(&self, headers: &[String]) -> bool {
        self.columns.len() == headers.len()
            && self
                .column_names()
                .zip(headers.iter())
                .all(|(schema_name, header)| schema_name == header)
    }
}
