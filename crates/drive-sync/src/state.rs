//! Navigation state and the four-event fold.
//!
//! [`reduce`] is pure: it never performs I/O and never looks at anything but
//! the current state and the action. Side effects are triggered by the store
//! in reaction to [`FolderAction::SelectFolder`], not by the fold.

use serde::Serialize;

use drive_core::types::FolderId;
use drive_entity::{File, Folder};

/// What the presentation layer renders: the current folder and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Active folder key; `None` is the root.
    pub folder_id: Option<FolderId>,
    /// Active folder metadata. `None` only while an unhinted selection is
    /// waiting for its lookup.
    pub folder: Option<Folder>,
    /// Child folders, oldest first.
    pub child_folders: Vec<Folder>,
    /// Child files, oldest first.
    pub child_files: Vec<File>,
}

impl NavigationState {
    /// The root folder with empty listings.
    pub fn root() -> Self {
        Self {
            folder_id: None,
            folder: Some(Folder::root()),
            child_folders: Vec::new(),
            child_files: Vec::new(),
        }
    }

    /// Whether the active folder is the root.
    pub fn is_root(&self) -> bool {
        self.folder_id.is_none()
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::root()
    }
}

/// Events folded into [`NavigationState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderAction {
    /// Navigate: reset to the new target with empty listings.
    SelectFolder {
        /// New active folder key.
        folder_id: Option<FolderId>,
        /// Already-known metadata, shown until the lookup verifies it.
        folder: Option<Folder>,
    },
    /// The lookup for the active folder completed.
    UpdateFolder {
        /// Verified metadata (or the root sentinel on failure).
        folder: Folder,
    },
    /// New snapshot of the child-folder listing.
    SetChildFolders {
        /// Full ordered listing.
        child_folders: Vec<Folder>,
    },
    /// New snapshot of the child-file listing.
    SetChildFiles {
        /// Full ordered listing.
        child_files: Vec<File>,
    },
}

impl FolderAction {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SelectFolder { .. } => "select-folder",
            Self::UpdateFolder { .. } => "update-folder",
            Self::SetChildFolders { .. } => "set-child-folders",
            Self::SetChildFiles { .. } => "set-child-files",
        }
    }
}

/// Produce the next state from the current state and one action.
pub fn reduce(state: &NavigationState, action: FolderAction) -> NavigationState {
    match action {
        FolderAction::SelectFolder { folder_id, folder } => NavigationState {
            folder_id,
            folder,
            child_folders: Vec::new(),
            child_files: Vec::new(),
        },
        FolderAction::UpdateFolder { folder } => NavigationState {
            folder: Some(folder),
            ..state.clone()
        },
        FolderAction::SetChildFolders { child_folders } => NavigationState {
            child_folders,
            ..state.clone()
        },
        FolderAction::SetChildFiles { child_files } => NavigationState {
            child_files,
            ..state.clone()
        },
    }
}
