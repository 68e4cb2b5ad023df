//! Ancestor path entries and rehydration of stored paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::FolderId;

/// A reference to an ancestor folder, as kept in a folder's `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    /// Ancestor key; `None` is the root.
    #[serde(default)]
    pub id: Option<FolderId>,
    /// Ancestor display name.
    pub name: String,
}

impl FolderRef {
    /// Create a path entry.
    pub fn new(id: Option<FolderId>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Rehydrate a stored `path` value into an ordered sequence.
///
/// Accepts the native array form, a JSON-encoded string of that array, or a
/// missing/null value (empty path).
pub(crate) fn rehydrate(doc_id: &str, raw: Option<&Value>) -> AppResult<Vec<FolderRef>> {
    let invalid = |e: serde_json::Error| {
        AppError::validation(format!("Folder {doc_id} has a malformed path: {e}"))
    };

    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(blob)) => serde_json::from_str(blob).map_err(invalid),
        Some(value @ Value::Array(_)) => serde_json::from_value(value.clone()).map_err(invalid),
        Some(other) => Err(AppError::validation(format!(
            "Folder {doc_id} path must be an array, got {other}"
        ))),
    }
}
