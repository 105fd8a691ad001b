//! Per-row document assembly
//!
//! Pure function of the header, schema, and one data row: either the
//! finished document or the first diagnostic message for the row.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{TypeSchema, MEMBER_ID_COLUMN};
use crate::types::{convert_field, validate_field, Converted};

/// One output document, serialized as a single JSON line
///
/// `augmentedData` holds one entry per non-empty, successfully converted
/// field, keyed by column name in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "augmentedData")]
    pub augmented_data: Map<String, Value>,
}

impl AugmentedDocument {
    /// Serialize to the single-line JSON form written to the document
    /// stream
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the document for one data row
///
/// Validation runs per field in header order and the first failing
/// column wins; conversion failures after successful validation are a
/// hard error for the row. Returns the row's diagnostic message on any
/// failure.
pub fn build_document(
    headers: &[String],
    schema: &TypeSchema,
    row: &[String],
    company_id: &str,
    member_id_column: &str,
) -> Result<AugmentedDocument, String> {
    if headers.len() != row.len() {
        return Err("Data length does not match headers".to_string());
    }

    let mut augmented_data = Map::new();
    for (name, value) in headers.iter().zip(row.iter()) {
        let declared_type = schema.declared_type(name).unwrap_or_default();

        if let Some(message) = validate_field(declared_type, value) {
            return Err(message);
        }

        match convert_field(declared_type, value) {
            Converted::Absent => {
                if name == member_id_column {
                    return Err(format!("{MEMBER_ID_COLUMN} cannot be empty"));
                }
            }
            Converted::Value(json_value) => {
                augmented_data.insert(name.clone(), json_value);
            }
            Converted::Failed(_) => {
                return Err(format!(
                    "Cannot convert '{name}' value '{value}' to '{declared_type}'"
                ));
            }
        }
    }

    let member_id_value = augmented_data
        .get(member_id_column)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let id = format!("{company_id}_{member_id_value}");

    Ok(AugmentedDocument { id, augmented_data })
}
