//! Streaming conversion engine
//!
//! Drives line-by-line iteration of the data file, performs the one-time
//! header checks, invokes the document builder per row, and manages the
//! output artifact's lifecycle. Every failure becomes a [`Diagnostic`]
//! in the returned outcome; nothing here panics or returns an error to
//! the caller.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::conversion::config::ConversionConfig;
use crate::conversion::document::build_document;
use crate::schema::{TypeSchema, MEMBER_ID_COLUMN};

/// Extension of the intermediate document stream artifact
pub const DOCUMENT_STREAM_EXTENSION: &str = "jpl";

/// One row- or file-level problem, keyed by 1-based line number
///
/// Line 0 is reserved for whole-file problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u64,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Summary of one conversion run
///
/// The output artifact only exists on disk when the run succeeded; a
/// run with diagnostics or zero written rows has already deleted it.
/// `output_path` is `None` only when the type file itself could not be
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    pub output_path: Option<PathBuf>,
    pub rows_written: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ConversionOutcome {
    /// A run counts as successful only with zero diagnostics and at
    /// least one written row
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty() && self.rows_written > 0
    }
}

/// Derive the output artifact name from the data file's path by
/// inserting the run timestamp before the extension and replacing the
/// extension with the document stream suffix
pub fn output_file_name(data_path: &Path, timestamp: &str) -> PathBuf {
    let stem = data_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    data_path.with_file_name(format!("{stem}_{timestamp}.{DOCUMENT_STREAM_EXTENSION}"))
}

/// The orchestrator: one instance per configuration, one `convert` call
/// per input file
pub struct StreamConverter {
    config: ConversionConfig,
}

struct RowStreamRun {
    rows_written: usize,
    diagnostics: Vec<Diagnostic>,
    saw_input: bool,
    fatal: bool,
}

impl StreamConverter {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Convert a data stream against its type stream
    ///
    /// `data_path` names the data file for diagnostics and determines
    /// where the output artifact is written.
    pub fn convert<D: Read, T: Read>(
        &self,
        data: D,
        data_path: &Path,
        types: T,
        company_id: &str,
    ) -> ConversionOutcome {
        let schema = match TypeSchema::load(types) {
            Ok(schema) => schema,
            Err(_) => {
                return ConversionOutcome {
                    output_path: None,
                    rows_written: 0,
                    diagnostics: vec![Diagnostic::new(0, "Type file is invalid or empty")],
                };
            }
        };

        let output_path = output_file_name(data_path, &self.config.run_timestamp());
        let run = self.stream_rows(data, &schema, company_id, &output_path);

        let mut diagnostics = run.diagnostics;
        if !diagnostics.is_empty() || run.rows_written == 0 {
            let _ = fs::remove_file(&output_path);
        }

        // Header-check failures abort with exactly one diagnostic and
        // skip the empty-file reconciliation. The whole-file message
        // keys at line 0, the no-data message at line 1.
        if !run.fatal {
            if !run.saw_input {
                diagnostics.push(Diagnostic::new(
                    0,
                    format!("{} is empty", data_path.display()),
                ));
            } else if run.rows_written == 0 && diagnostics.is_empty() {
                diagnostics.push(Diagnostic::new(
                    1,
                    format!("{} doesn't have data lines", data_path.display()),
                ));
            }
        }

        ConversionOutcome {
            output_path: Some(output_path),
            rows_written: run.rows_written,
            diagnostics,
        }
    }

    /// Convert a data file on disk against a type file on disk
    pub fn convert_paths(
        &self,
        data_path: &Path,
        type_path: &Path,
        company_id: &str,
    ) -> io::Result<ConversionOutcome> {
        let data = File::open(data_path)?;
        let types = File::open(type_path)?;
        Ok(self.convert(data, data_path, types, company_id))
    }

    fn stream_rows<D: Read>(
        &self,
        data: D,
        schema: &TypeSchema,
        company_id: &str,
        output_path: &Path,
    ) -> RowStreamRun {
        let mut run = RowStreamRun {
            rows_written: 0,
            diagnostics: Vec::new(),
            saw_input: false,
            fatal: false,
        };

        let output_file = match File::create(output_path) {
            Ok(file) => file,
            Err(err) => {
                run.fatal = true;
                run.diagnostics.push(Diagnostic::new(
                    0,
                    format!("Cannot create {}: {err}", output_path.display()),
                ));
                return run;
            }
        };
        let mut writer = BufWriter::new(output_file);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut headers: Vec<String> = Vec::new();
        let mut member_column = String::new();
        let mut saw_header = false;
        let mut record = csv::StringRecord::new();
        let mut current_line: u64 = 0;

        // Fully blank lines never surface from the reader, so they are
        // skipped without touching counters or diagnostics.
        loop {
            match reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {}
                Err(err) => {
                    run.saw_input = true;
                    current_line = err
                        .position()
                        .map(|position| position.line())
                        .unwrap_or(current_line + 1);
                    run.diagnostics
                        .push(Diagnostic::new(current_line, err.to_string()));
                    if run.diagnostics.len() >= self.config.max_errors {
                        break;
                    }
                    continue;
                }
            }
            run.saw_input = true;
            current_line = record
                .position()
                .map(|position| position.line())
                .unwrap_or(current_line + 1);

            if !saw_header {
                saw_header = true;
                headers = record.iter().map(str::to_string).collect();

                if !headers
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(MEMBER_ID_COLUMN))
                {
                    run.fatal = true;
                    run.diagnostics.push(Diagnostic::new(
                        1,
                        format!("Missing required column {MEMBER_ID_COLUMN}"),
                    ));
                    break;
                }
                if !schema.matches_headers(&headers) {
                    run.fatal = true;
                    run.diagnostics.push(Diagnostic::new(
                        1,
                        "Headers in data file don't match the types file",
                    ));
                    break;
                }
                match schema.member_id_column() {
                    Some(name) if schema.declared_type(name) == Some("string") => {
                        member_column = name.to_string();
                    }
                    Some(name) => {
                        run.fatal = true;
                        run.diagnostics
                            .push(Diagnostic::new(1, format!("'{name}' type must be string")));
                        break;
                    }
                    // headers equal the schema's columns and contain the
                    // member id, so the schema contains it too
                    None => {
                        run.fatal = true;
                        run.diagnostics.push(Diagnostic::new(
                            1,
                            format!("Missing required column {MEMBER_ID_COLUMN}"),
                        ));
                        break;
                    }
                }
                continue;
            }

            let fields: Vec<String> = record.iter().map(str::to_string).collect();
            match build_document(&headers, schema, &fields, company_id, &member_column) {
                Ok(document) => {
                    let written = document
                        .to_json_line()
                        .map_err(io::Error::from)
                        .and_then(|line| writeln!(writer, "{line}"));
                    match written {
                        Ok(()) => run.rows_written += 1,
                        Err(err) => {
                            run.diagnostics.push(Diagnostic::new(
                                current_line,
                                format!("Cannot write {}: {err}", output_path.display()),
                            ));
                            break;
                        }
                    }
                }
                Err(message) => {
                    run.diagnostics.push(Diagnostic::new(current_line, message));
                    if run.diagnostics.len() >= self.config.max_errors {
                        break;
                    }
                }
            }
        }

        if let Err(err) = writer.flush() {
            run.diagnostics.push(Diagnostic::new(
                0,
                format!("Cannot write {}: {err}", output_path.display()),
            ));
        }
        run
    }
}
