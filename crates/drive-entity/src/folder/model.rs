//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drive_core::error::AppError;
use drive_core::types::{Document, FolderId, UserId};

use super::path::{self, FolderRef};
use crate::format;

/// Display name of the virtual top of the hierarchy.
pub const ROOT_FOLDER_NAME: &str = "Root";

/// A folder in the hierarchy, or the root sentinel.
///
/// Stored folders always carry `id`, `user_id`, and `created_at`. The root
/// sentinel is never persisted: it has no id, no owner, and an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Folder key (`None` only for the root sentinel).
    pub id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Parent folder key (`None` for children of the root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FolderId>,
    /// The folder owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Creation time, used for ordering siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Ancestors, root first, parent last.
    #[serde(default)]
    pub path: Vec<FolderRef>,
}

impl Folder {
    /// The root sentinel: `{name: "Root", id: null, path: []}`.
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_FOLDER_NAME.to_string(),
            parent_id: None,
            user_id: None,
            created_at: None,
            path: Vec::new(),
        }
    }

    /// Check if this is the root sentinel.
    pub fn is_root(&self) -> bool {
        self.id.is_none()
    }

    /// A path entry pointing at this folder.
    pub fn to_ref(&self) -> FolderRef {
        FolderRef::new(self.id.clone(), self.name.clone())
    }

    /// The path a direct child of this folder would carry.
    ///
    /// The root sentinel contributes itself as the first entry, matching how
    /// stored paths begin with the root.
    pub fn child_path(&self) -> Vec<FolderRef> {
        let mut path = self.path.clone();
        path.push(self.to_ref());
        path
    }
}

impl TryFrom<Document> for Folder {
    type Error = AppError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        Self::try_from(&doc)
    }
}

impl TryFrom<&Document> for Folder {
    type Error = AppError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Some(FolderId::new(doc.id.clone())),
            name: format::required_str(doc, "name")?,
            parent_id: format::optional_ref(doc, "parentId")?.map(FolderId::from),
            user_id: format::optional_ref(doc, "userId")?.map(UserId::from),
            created_at: Some(format::timestamp(doc, "createdAt")?),
            path: path::rehydrate(&doc.id, doc.get("path"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).expect("document")
    }

    #[test]
    fn test_root_sentinel_shape() {
        let root = Folder::root();
        assert!(root.is_root());
        assert_eq!(root.name, "Root");
        assert!(root.path.is_empty());
        assert_eq!(
            serde_json::to_value(&root).expect("serialize"),
            json!({"id": null, "name": "Root", "path": []})
        );
    }

    #[test]
    fn test_format_document() {
        let folder = Folder::try_from(doc(json!({
            "id": "F2",
            "name": "Reports",
            "parentId": "F1",
            "userId": "u1",
            "createdAt": 1000,
            "path": [{"id": null, "name": "Root"}, {"id": "F1", "name": "Docs"}]
        })))
        .expect("format");

        assert_eq!(folder.id, Some(FolderId::new("F2")));
        assert_eq!(folder.parent_id, Some(FolderId::new("F1")));
        assert_eq!(folder.user_id, Some(UserId::new("u1")));
        assert_eq!(folder.path.len(), 2);
        assert!(!folder.is_root());
    }

    #[test]
    fn test_missing_name_is_validation_error() {
        let err = Folder::try_from(doc(json!({"id": "F1", "createdAt": 1}))).unwrap_err();
        assert_eq!(err.kind, drive_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_child_path_appends_self() {
        let root = Folder::root();
        assert_eq!(root.child_path(), vec![FolderRef::new(None, "Root")]);
    }
}
