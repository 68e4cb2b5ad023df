//! In-memory document store with live queries.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::debug;
use uuid::Uuid;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::traits::gateway::{DocumentGateway, ListenerRegistration, SnapshotCallback};
use drive_core::types::{Collection, Document, ListenQuery, UserId};
use drive_entity::{File, Folder};

use super::faults::Faults;
use super::listeners::ListenerRegistry;
use crate::seed::Seed;

/// A document plus its insertion sequence, the store-native tie-breaker.
#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    doc: Document,
}

#[derive(Debug, Default)]
struct Collections {
    folders: HashMap<String, StoredDocument>,
    files: HashMap<String, StoredDocument>,
    next_seq: u64,
}

impl Collections {
    fn get(&self, collection: Collection) -> &HashMap<String, StoredDocument> {
        match collection {
            Collection::Folders => &self.folders,
            Collection::Files => &self.files,
        }
    }

    fn get_mut(&mut self, collection: Collection) -> &mut HashMap<String, StoredDocument> {
        match collection {
            Collection::Folders => &mut self.folders,
            Collection::Files => &mut self.files,
        }
    }

    /// Evaluate a query: filter, then order by the sort field with insertion
    /// order breaking ties.
    fn run(&self, query: &ListenQuery) -> Vec<Document> {
        let mut matches: Vec<&StoredDocument> = self
            .get(query.collection)
            .values()
            .filter(|stored| query.matches(&stored.doc))
            .collect();

        let field = query.order_by.field.as_str();
        matches.sort_by(|a, b| {
            query
                .order_by
                .compare(a.doc.get(field), b.doc.get(field))
                .then(a.seq.cmp(&b.seq))
        });

        matches.into_iter().map(|stored| stored.doc.clone()).collect()
    }
}

/// Single-process document store implementing [`DocumentGateway`].
///
/// Every mutation notifies the live queries whose result set it could
/// change. Mutations are serialized, so each listener sees snapshots in
/// mutation order.
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
    listeners: ListenerRegistry,
    /// Serializes mutate-then-notify so snapshot order follows write order.
    write_lock: Mutex<()>,
    faults: Faults,
}

impl std::fmt::Debug for MemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocumentStore")
            .field("listeners", &self.listeners.count(None))
            .finish_non_exhaustive()
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            listeners: ListenerRegistry::default(),
            write_lock: Mutex::new(()),
            faults: Faults::default(),
        }
    }

    /// Create a store pre-populated from a seed.
    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        store.load_seed(seed);
        store
    }

    /// Insert every document of a seed, in order.
    pub fn load_seed(&self, seed: Seed) {
        let folders = seed.folders.len();
        let files = seed.files.len();
        for doc in seed.folders {
            self.put(Collection::Folders, doc);
        }
        for doc in seed.files {
            self.put(Collection::Files, doc);
        }
        debug!(folders, files, "Loaded seed documents");
    }

    /// Insert or replace a document under its own key.
    pub fn put(&self, collection: Collection, doc: Document) {
        let _guard = lock(&self.write_lock);
        let previous = {
            let mut collections = write(&self.collections);
            let seq = collections.next_seq;
            collections.next_seq += 1;
            collections
                .get_mut(collection)
                .insert(doc.id.clone(), StoredDocument {
                    seq,
                    doc: doc.clone(),
                })
        };
        self.notify_change(collection, previous.map(|p| p.doc).as_ref(), Some(&doc));
    }

    /// Insert a document under a freshly generated key and return the key.
    pub fn insert(&self, collection: Collection, data: Map<String, Value>) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.put(collection, Document::new(id.clone(), data));
        id
    }

    /// Merge `patch` into an existing document's fields.
    pub fn update(&self, collection: Collection, id: &str, patch: Map<String, Value>) -> AppResult<()> {
        let _guard = lock(&self.write_lock);
        let (before, after) = {
            let mut collections = write(&self.collections);
            let stored = collections
                .get_mut(collection)
                .get_mut(id)
                .ok_or_else(|| AppError::not_found(format!("{collection}/{id} not found")))?;
            let before = stored.doc.clone();
            stored.doc.data.extend(patch);
            (before, stored.doc.clone())
        };
        self.notify_change(collection, Some(&before), Some(&after));
        Ok(())
    }

    /// Delete a document, returning it.
    pub fn delete(&self, collection: Collection, id: &str) -> AppResult<Document> {
        let _guard = lock(&self.write_lock);
        let removed = write(&self.collections)
            .get_mut(collection)
            .remove(id)
            .ok_or_else(|| AppError::not_found(format!("{collection}/{id} not found")))?;
        self.notify_change(collection, Some(&removed.doc), None);
        Ok(removed.doc)
    }

    /// Create a folder under `parent` owned by `owner`, the way the upload
    /// UI does: the child's path is the parent's path plus the parent.
    pub fn create_folder(&self, name: &str, parent: &Folder, owner: &UserId) -> AppResult<Folder> {
        let path = serde_json::to_value(parent.child_path())?;
        let data = object(json!({
            "name": name,
            "parentId": parent.id,
            "userId": owner,
            "createdAt": Utc::now().timestamp_millis(),
            "path": path,
        }));
        let id = self.insert(Collection::Folders, data);
        self.fetch(Collection::Folders, &id)
    }

    /// Create a file record inside `folder` owned by `owner`.
    pub fn create_file(
        &self,
        name: &str,
        folder: &Folder,
        owner: &UserId,
        url: Option<&str>,
    ) -> AppResult<File> {
        let mut data = object(json!({
            "name": name,
            "folderId": folder.id,
            "userId": owner,
            "createdAt": Utc::now().timestamp_millis(),
        }));
        if let Some(url) = url {
            data.insert("url".to_string(), Value::String(url.to_string()));
        }
        let id = self.insert(Collection::Files, data);
        self.fetch(Collection::Files, &id)
    }

    /// Make lookups of one document fail with a permission error.
    pub fn deny(&self, collection: Collection, id: &str) {
        self.faults.deny(collection, id);
    }

    /// Undo [`deny`](Self::deny).
    pub fn allow(&self, collection: Collection, id: &str) {
        self.faults.allow(collection, id);
    }

    /// Reject (or accept again) every new live query.
    pub fn reject_queries(&self, reject: bool) {
        self.faults.set_reject_queries(reject);
    }

    /// Delay every point lookup by `delay`.
    pub fn set_lookup_delay(&self, delay: Duration) {
        self.faults.set_lookup_delay(delay);
    }

    /// Number of open live queries.
    pub fn listener_count(&self) -> usize {
        self.listeners.count(None)
    }

    /// Number of open live queries on one collection.
    pub fn listener_count_for(&self, collection: Collection) -> usize {
        self.listeners.count(Some(collection))
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        read(&self.collections).get(collection).len()
    }

    /// Whether a collection is empty.
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn fetch<T>(&self, collection: Collection, id: &str) -> AppResult<T>
    where
        T: TryFrom<Document, Error = AppError>,
    {
        let doc = read(&self.collections)
            .get(collection)
            .get(id)
            .map(|stored| stored.doc.clone())
            .ok_or_else(|| AppError::not_found(format!("{collection}/{id} not found")))?;
        T::try_from(doc)
    }

    /// Push fresh snapshots to every listener that matched the document
    /// before or after the change.
    fn notify_change(&self, collection: Collection, before: Option<&Document>, after: Option<&Document>) {
        let delivered = self.listeners.notify(
            collection,
            |query| {
                before.is_some_and(|d| query.matches(d)) || after.is_some_and(|d| query.matches(d))
            },
            |query| read(&self.collections).run(query),
        );
        if delivered > 0 {
            debug!(%collection, delivered, "Delivered live query snapshots");
        }
    }
}

#[async_trait]
impl DocumentGateway for MemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<Document>> {
        let delay = self.faults.lookup_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.faults.is_denied(collection, id) {
            return Err(AppError::authorization(format!(
                "Missing or insufficient permissions for {collection}/{id}"
            )));
        }

        Ok(read(&self.collections)
            .get(collection)
            .get(id)
            .map(|stored| stored.doc.clone()))
    }

    fn listen(
        &self,
        query: ListenQuery,
        on_snapshot: SnapshotCallback,
    ) -> AppResult<ListenerRegistration> {
        if self.faults.rejects_queries() {
            return Err(AppError::service_unavailable(format!(
                "Live query on {} rejected",
                query.collection
            )));
        }
        if query.order_by.field.is_empty() || query.filters.iter().any(|f| f.field.is_empty()) {
            return Err(AppError::validation("Live query has an empty field name"));
        }

        // Held so no mutation slips between registration and the initial snapshot.
        let _guard = lock(&self.write_lock);
        let collection = query.collection;
        let (id, registration) = self.listeners.register(query, on_snapshot);
        self.listeners
            .deliver_to(id, |query| read(&self.collections).run(query));
        debug!(%collection, listener = id, "Live query opened");
        Ok(registration)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn lock(mutex: &Mutex<()>) -> MutexGuard<'_, ()> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read(lock: &RwLock<Collections>) -> RwLockReadGuard<'_, Collections> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(lock: &RwLock<Collections>) -> RwLockWriteGuard<'_, Collections> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
