//! Folder resolution with fallback to the root sentinel.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::traits::DocumentGateway;
use drive_core::types::{Collection, FolderId};
use drive_entity::Folder;

/// Resolves a folder key to its current metadata.
///
/// Resolution never fails: a missing key, a lookup error, a permission
/// error, or a timeout all resolve to [`Folder::root()`].
#[derive(Debug, Clone)]
pub struct FolderResolver {
    gateway: Arc<dyn DocumentGateway>,
    timeout: Duration,
}

impl FolderResolver {
    /// Create a resolver bounded by `timeout` per lookup.
    pub fn new(gateway: Arc<dyn DocumentGateway>, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    /// Resolve without a round trip if possible.
    ///
    /// Returns the root sentinel for `None`, and `None` when a lookup is
    /// required.
    pub fn resolve_immediate(folder_id: Option<&FolderId>) -> Option<Folder> {
        match folder_id {
            None => Some(Folder::root()),
            Some(_) => None,
        }
    }

    /// Resolve a folder key, substituting the root sentinel on any failure.
    pub async fn resolve(&self, folder_id: Option<&FolderId>) -> Folder {
        let Some(id) = folder_id else {
            return Folder::root();
        };

        match self.lookup(id).await {
            Ok(folder) => {
                debug!(folder_id = %id, "Resolved folder");
                folder
            }
            Err(e) => {
                warn!(folder_id = %id, error = %e, "Folder lookup failed, falling back to root");
                Folder::root()
            }
        }
    }

    /// Fetch and format one folder, surfacing every failure.
    pub async fn lookup(&self, id: &FolderId) -> AppResult<Folder> {
        let doc = tokio::time::timeout(self.timeout, self.gateway.get(Collection::Folders, id.as_str()))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "Lookup of folder {id} exceeded {}ms",
                    self.timeout.as_millis()
                ))
            })??
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        Folder::try_from(doc)
    }
}
