//! CSV to document stream conversion module
//!
//! This module contains the per-row document builder, the streaming
//! orchestrator, and their configuration.

pub mod config;
pub mod document;
pub mod engine;

pub use config::ConversionConfig;
pub use document::{build_document, AugmentedDocument};
pub use engine::{output_file_name, ConversionOutcome, Diagnostic, StreamConverter};
