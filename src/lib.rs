//! VED Converter
//!
//! A Rust CLI tool for converting member data CSV files into encrypted
//! VED archives. The pipeline runs in three stages: a type-validated
//! CSV to JSONL conversion (`.jpl`), a single-entry Deflate archive
//! (`.vad`), and GPG encryption for a set of recipients (`.ved`).

// Allow dead code for library exports that may not be used by the binary yet
#![allow(dead_code)]

pub mod archive;
pub mod cli;
pub mod conversion;
pub mod encrypt;
pub mod error;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use archive::{ArchiveReport, DATA_NAME_IN_ARCHIVE};
pub use conversion::{
    build_document, output_file_name, AugmentedDocument, ConversionConfig, ConversionOutcome,
    Diagnostic, StreamConverter,
};
pub use encrypt::{Gpg, GpgConfig};
pub use error::{ArchiveError, EncryptError, SchemaError};
pub use schema::{TypeSchema, MEMBER_ID_COLUMN};
pub use types::{convert_field, validate_field, Converted, CsvType};

use std::io;
use std::path::Path;

/// Convert a data file against its type file with default configuration
pub fn convert_file(
    data_path: &Path,
    type_path: &Path,
    company_id: &str,
) -> io::Result<ConversionOutcome> {
    convert_file_with_config(data_path, type_path, company_id, ConversionConfig::default())
}

/// Convert a data file against its type file with custom configuration
pub fn convert_file_with_config(
    data_path: &Path,
    type_path: &Path,
    company_id: &str,
    config: ConversionConfig,
) -> io::Result<ConversionOutcome> {
    StreamConverter::new(config).convert_paths(data_path, type_path, company_id)
}
