//! Error types and handling infrastructure for the conversion pipeline
//!
//! Row- and file-level problems inside the conversion core are reported as
//! [`Diagnostic`](crate::conversion::Diagnostic) values, never as errors.
//! The enums here cover the pipeline stages around the core: loading the
//! type file, archiving the document stream, and encrypting the archive.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading the two-record type file
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Type file is invalid or empty")]
    InvalidOrEmpty,

    #[error("Failed to read type file: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse type file: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while compressing the document stream into an archive
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Error compressing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error compressing {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl ArchiveError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while setting up GPG or encrypting the archive
#[derive(Debug, thiserror::Error)]
pub enum EncryptError {
    #[error("gpg binary not found, it might not be installed on the machine")]
    BinaryNotFound,

    #[error("missing required public key {0:?}")]
    MissingPublicKeys(Vec<String>),

    #[error("Failed to import key {path}: {message}")]
    KeyImport { path: PathBuf, message: String },

    #[error("Error encrypting {path}: {message}")]
    Encrypt { path: PathBuf, message: String },

    #[error("gpg invocation failed: {0}")]
    Io(#[from] io::Error),
}

/// Result type for schema loading
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for archiving operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Result type for encryption operations
pub type EncryptResult<T> = Result<T, EncryptError>;
