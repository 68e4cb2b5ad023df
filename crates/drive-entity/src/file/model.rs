//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drive_core::error::AppError;
use drive_core::types::{Document, FileId, FolderId, UserId};

use crate::format;

/// A file listed inside a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// File key.
    pub id: FileId,
    /// File name (including extension).
    pub name: String,
    /// Containing folder (`None` for files at the root).
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    /// The file owner.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Creation time, used for ordering siblings.
    pub created_at: DateTime<Utc>,
    /// Download location, if the store records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TryFrom<Document> for File {
    type Error = AppError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        Self::try_from(&doc)
    }
}

impl TryFrom<&Document> for File {
    type Error = AppError;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        Ok(Self {
            id: FileId::new(doc.id.clone()),
            name: format::required_str(doc, "name")?,
            folder_id: format::optional_ref(doc, "folderId")?.map(FolderId::from),
            user_id: format::optional_ref(doc, "userId")?.map(UserId::from),
            created_at: format::timestamp(doc, "createdAt")?,
            url: doc.get_str("url").map(str::to_string),
        })
    }
}
