//! # drive-entity
//!
//! Domain entity models for Drive. Every struct in this crate is the
//! canonical shape of a document read from the store; conversion from a raw
//! [`Document`](drive_core::types::Document) goes through `TryFrom`.

pub mod file;
pub mod folder;
mod format;

pub use file::File;
pub use folder::{Folder, FolderRef, ROOT_FOLDER_NAME};
