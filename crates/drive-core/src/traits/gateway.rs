//! Document store gateway trait and live-listener registration handle.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::document::{Collection, Document};
use crate::types::query::ListenQuery;

/// Callback invoked with the full ordered result set of a live query.
pub type SnapshotCallback = Arc<dyn Fn(Vec<Document>) + Send + Sync>;

/// Trait for document stores offering point lookups and live queries.
///
/// Implementations must deliver snapshots for a single listener in the order
/// the underlying changes happened, and must never invoke a listener's
/// callback after its [`ListenerRegistration`] has been removed.
#[async_trait]
pub trait DocumentGateway: Send + Sync + fmt::Debug + 'static {
    /// Fetch a single document. `Ok(None)` means the key does not exist.
    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Document>>;

    /// Register a live query.
    ///
    /// The callback receives the initial result set and then the complete
    /// result set after every change that affects it, until the returned
    /// registration is removed or dropped.
    fn listen(&self, query: ListenQuery, on_snapshot: SnapshotCallback)
    -> AppResult<ListenerRegistration>;
}

/// Handle that stops a live query.
///
/// [`remove`](Self::remove) is idempotent; dropping the handle removes the
/// listener as well.
pub struct ListenerRegistration {
    detach: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl ListenerRegistration {
    /// Wrap the gateway-specific detach action.
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Mutex::new(Some(Box::new(detach))),
        }
    }

    /// Stop the live query. Calling this more than once has no further effect.
    pub fn remove(&self) {
        let detach = match self.detach.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(detach) = detach {
            detach();
        }
    }

    /// Whether [`remove`](Self::remove) has already run.
    pub fn is_removed(&self) -> bool {
        match self.detach.lock() {
            Ok(guard) => guard.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }
}

impl Drop for ListenerRegistration {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("removed", &self.is_removed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_remove_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registration = ListenerRegistration::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!registration.is_removed());
        registration.remove();
        registration.remove();
        assert!(registration.is_removed());
        drop(registration);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_detaches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        {
            let _registration = ListenerRegistration::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
