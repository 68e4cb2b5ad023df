//! Live listener registry: which queries are open and their callbacks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use drive_core::traits::gateway::{ListenerRegistration, SnapshotCallback};
use drive_core::types::{Collection, Document, ListenQuery};

/// Listener identifier.
pub(crate) type ListenerId = u64;

/// An open live query.
pub(crate) struct Listener {
    pub(crate) query: ListenQuery,
    pub(crate) callback: SnapshotCallback,
}

/// Registry of all open live queries.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Arc<DashMap<ListenerId, Listener>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    /// Register a listener and build the handle that detaches it.
    pub(crate) fn register(
        &self,
        query: ListenQuery,
        callback: SnapshotCallback,
    ) -> (ListenerId, ListenerRegistration) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.listeners.insert(id, Listener { query, callback });

        let listeners = Arc::clone(&self.listeners);
        let registration = ListenerRegistration::new(move || {
            if listeners.remove(&id).is_some() {
                tracing::debug!(listener = id, "Live query closed");
            }
        });
        (id, registration)
    }

    /// Invoke one listener with a snapshot computed by `snapshot`.
    ///
    /// The shard read guard is held across the callback, so a concurrent
    /// detach waits until delivery has finished. Callbacks must not detach
    /// their own registration.
    pub(crate) fn deliver_to(
        &self,
        id: ListenerId,
        snapshot: impl FnOnce(&ListenQuery) -> Vec<Document>,
    ) {
        if let Some(listener) = self.listeners.get(&id) {
            let docs = snapshot(&listener.query);
            (listener.callback)(docs);
        }
    }

    /// Notify every listener on `collection` for which `affected` holds.
    pub(crate) fn notify(
        &self,
        collection: Collection,
        affected: impl Fn(&ListenQuery) -> bool,
        snapshot: impl Fn(&ListenQuery) -> Vec<Document>,
    ) -> usize {
        let mut delivered = 0;
        for entry in self.listeners.iter() {
            let listener = entry.value();
            if listener.query.collection != collection || !affected(&listener.query) {
                continue;
            }
            (listener.callback)(snapshot(&listener.query));
            delivered += 1;
        }
        delivered
    }

    /// Number of open listeners, optionally restricted to one collection.
    pub(crate) fn count(&self, collection: Option<Collection>) -> usize {
        match collection {
            None => self.listeners.len(),
            Some(c) => self
                .listeners
                .iter()
                .filter(|entry| entry.value().query.collection == c)
                .count(),
        }
    }
}
