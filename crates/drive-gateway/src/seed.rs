//! Seed data: documents exported from a store, loaded in bulk.

use std::path::Path;

use serde::{Deserialize, Serialize};

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::Document;

/// Documents for both collections, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    /// Documents of the `folders` collection.
    #[serde(default)]
    pub folders: Vec<Document>,
    /// Documents of the `files` collection.
    #[serde(default)]
    pub files: Vec<Document>,
}

impl Seed {
    /// Parse a seed from JSON text.
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed file.
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::with_source(
                drive_core::error::ErrorKind::Io,
                format!("Failed to read seed file {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let seed = Seed::from_json(
            r#"{
                "folders": [{"id": "F1", "name": "Docs", "parentId": null, "userId": "u1", "createdAt": 1}],
                "files": []
            }"#,
        )
        .expect("parse");
        assert_eq!(seed.folders.len(), 1);
        assert_eq!(seed.folders[0].get_str("name"), Some("Docs"));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let seed = Seed::from_json("{}").expect("parse");
        assert!(seed.folders.is_empty());
        assert!(seed.files.is_empty());
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Seed::from_json("{not json").unwrap_err();
        assert_eq!(err.kind, drive_core::error::ErrorKind::Serialization);
    }
}
