//! The closed set of recognized column types
//!
//! Each type carries a validation rule and a conversion rule. Validation
//! answers "could this raw field become a value of the declared type";
//! conversion produces the typed JSON value. Both treat the empty string
//! as universally valid and convert it to [`Converted::Absent`], so empty
//! fields are omitted from documents rather than stored as null.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Recognized column types, exactly these seven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Json,
}

/// Outcome of converting one raw field
///
/// `Absent` (empty input or unknown type) is distinct from `Failed`:
/// an absent field is omitted from the document, a failed one fails the
/// whole row.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Absent,
    Value(Value),
    Failed(String),
}

impl Converted {
    pub fn is_absent(&self) -> bool {
        matches!(self, Converted::Absent)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Converted::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Datetime formats tried before date-only formats. `%B` also matches
/// abbreviated month names when parsing.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%B %d, %Y, %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

/// Date-only formats; M/D/Y is tried before D/M/Y so ambiguous slashed
/// dates resolve month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";
const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl CsvType {
    /// Parse a declared type name from the type file
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(CsvType::String),
            "integer" => Some(CsvType::Integer),
            "float" => Some(CsvType::Float),
            "boolean" => Some(CsvType::Boolean),
            "date" => Some(CsvType::Date),
            "datetime" => Some(CsvType::DateTime),
            "json" => Some(CsvType::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CsvType::String => "string",
            CsvType::Integer => "integer",
            CsvType::Float => "float",
            CsvType::Boolean => "boolean",
            CsvType::Date => "date",
            CsvType::DateTime => "datetime",
            CsvType::Json => "json",
        }
    }

    /// All recognized types, in declaration order
    pub fn all() -> [CsvType; 7] {
        [
            CsvType::String,
            CsvType::Integer,
            CsvType::Float,
            CsvType::Boolean,
            CsvType::Date,
            CsvType::DateTime,
            CsvType::Json,
        ]
    }

    /// Check a non-empty raw field against this type's validation rule
    pub fn is_valid(&self, value: &str) -> bool {
        match self {
            CsvType::String => true,
            CsvType::Integer => is_integral(value),
            CsvType::Float => value.parse::<f64>().is_ok(),
            CsvType::Boolean => parse_bool(value).is_some(),
            CsvType::Date | CsvType::DateTime => parse_date_time(value).is_some(),
            CsvType::Json => serde_json::from_str::<Value>(value).is_ok(),
        }
    }

    /// Convert a non-empty raw field to its typed JSON value
    pub fn convert(&self, value: &str) -> Converted {
        match self {
            CsvType::String => Converted::Value(Value::String(value.to_string())),
            CsvType::Integer => match value.parse::<i64>() {
                Ok(parsed) => Converted::Value(Value::from(parsed)),
                Err(err) => Converted::Failed(err.to_string()),
            },
            CsvType::Float => match value.parse::<f64>() {
                Ok(parsed) => match serde_json::Number::from_f64(parsed) {
                    Some(number) => Converted::Value(Value::Number(number)),
                    None => Converted::Failed(format!("{value} is not a finite number")),
                },
                Err(err) => Converted::Failed(err.to_string()),
            },
            CsvType::Boolean => match parse_bool(value) {
                Some(parsed) => Converted::Value(Value::Bool(parsed)),
                None => Converted::Failed(format!("{value} is not a recognized boolean form")),
            },
            CsvType::Date => match parse_date_time(value) {
                Some(parsed) => Converted::Value(Value::String(
                    parsed.format(DATE_OUTPUT_FORMAT).to_string(),
                )),
                None => Converted::Failed(format!("{value} is not a parseable date")),
            },
            CsvType::DateTime => match parse_date_time(value) {
                Some(parsed) => Converted::Value(Value::String(
                    parsed.format(DATETIME_OUTPUT_FORMAT).to_string(),
                )),
                None => Converted::Failed(format!("{value} is not a parseable datetime")),
            },
            CsvType::Json => match serde_json::from_str::<Value>(value) {
                Ok(parsed) => Converted::Value(parsed),
                Err(err) => Converted::Failed(err.to_string()),
            },
        }
    }
}

/// Validate one raw field against its declared type name
///
/// Returns `None` when valid, otherwise the diagnostic message. Unknown
/// type names are a schema problem and reported as such; empty input is
/// valid for every type.
pub fn validate_field(declared_type: &str, value: &str) -> Option<String> {
    let Some(csv_type) = CsvType::parse(declared_type) else {
        return Some(format!("{declared_type} is not known type"));
    };
    if value.is_empty() || csv_type.is_valid(value) {
        None
    } else {
        Some(format!("{value} is not a valid {declared_type}"))
    }
}

/// Convert one raw field according to its declared type name
///
/// Empty input and unknown type names both yield [`Converted::Absent`];
/// validation runs first and flags unknown types before conversion is
/// reached, so the silent drop here is never the only signal.
pub fn convert_field(declared_type: &str, value: &str) -> Converted {
    if value.is_empty() {
        return Converted::Absent;
    }
    match CsvType::parse(declared_type) {
        Some(csv_type) => csv_type.convert(value),
        None => Converted::Absent,
    }
}

/// Integer rule: the integer parse must agree with the float parse, so
/// `1.0` and values past f64's exact-integer range are rejected.
fn is_integral(value: &str) -> bool {
    let Ok(int_value) = value.parse::<i64>() else {
        return false;
    };
    let Ok(float_value) = value.parse::<f64>() else {
        return false;
    };
    int_value as f64 == float_value && float_value as i64 == int_value
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "0" | "false" => Some(false),
        "1" | "true" => Some(true),
        _ => None,
    }
}

/// Shared date/datetime acceptance rule. Numeric-only tokens are
/// ambiguous as calendar dates and always rejected.
fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if value.parse::<i64>().is_ok() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}
