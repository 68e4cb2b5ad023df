//! Raw documents and collection names as seen by the document store.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The two collections the synchronizer reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// The `folders` collection.
    Folders,
    /// The `files` collection.
    Files,
}

impl Collection {
    /// Collection name in the backing store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folders => "folders",
            Self::Files => "files",
        }
    }

    /// Field holding the reference to the containing folder.
    pub fn parent_field(&self) -> &'static str {
        match self {
            Self::Folders => "parentId",
            Self::Files => "folderId",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document: an opaque key plus its field map.
///
/// Serialized with the fields flattened beside `id`, the way documents are
/// exported from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document key.
    pub id: String,
    /// Document fields.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Document {
    /// Create a document from a key and field map.
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Look up a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Look up a string field; `null`, missing, and non-string values are `None`.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}
