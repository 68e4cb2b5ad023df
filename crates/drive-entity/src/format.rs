//! Field extraction helpers shared by the entity conversions.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::Document;

/// Read a required string field.
pub(crate) fn required_str(doc: &Document, field: &str) -> AppResult<String> {
    doc.get_str(field).map(str::to_string).ok_or_else(|| {
        AppError::validation(format!("Document {} is missing string field '{field}'", doc.id))
    })
}

/// Read an optional reference field; `null` and missing both mean "none".
pub(crate) fn optional_ref(doc: &Document, field: &str) -> AppResult<Option<String>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AppError::validation(format!(
            "Document {} field '{field}' must be a string or null, got {other}",
            doc.id
        ))),
    }
}

/// Parse `createdAt`, stored either as epoch milliseconds or RFC 3339.
pub(crate) fn timestamp(doc: &Document, field: &str) -> AppResult<DateTime<Utc>> {
    let invalid = || AppError::validation(format!("Document {} has an invalid '{field}'", doc.id));

    match doc.get(field) {
        Some(Value::Number(n)) => {
            let millis = n.as_i64().ok_or_else(invalid)?;
            Utc.timestamp_millis_opt(millis).single().ok_or_else(invalid)
        }
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
