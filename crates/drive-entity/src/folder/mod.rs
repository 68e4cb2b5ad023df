//! Folder domain entities.

pub mod model;
pub mod path;

pub use model::{Folder, ROOT_FOLDER_NAME};
pub use path::FolderRef;
