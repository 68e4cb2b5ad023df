//! Live listings of a folder's children.
//!
//! One [`ListingSubscription`] wraps one live query. It formats every
//! snapshot into entities and hands the full ordered sequence to its
//! callback until it is unsubscribed.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, warn};

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::traits::{DocumentGateway, ListenerRegistration};
use drive_core::types::{Collection, Document, FolderId, ListenQuery, UserId};
use drive_entity::{File, Folder};

/// An entity kind that can be listed under a parent folder.
pub trait Listable: TryFrom<Document, Error = AppError> + Send + 'static {
    /// Collection the entity lives in.
    const COLLECTION: Collection;
}

impl Listable for Folder {
    const COLLECTION: Collection = Collection::Folders;
}

impl Listable for File {
    const COLLECTION: Collection = Collection::Files;
}

/// Lifecycle of a listing subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Closed; no further updates will be delivered.
    Unsubscribed,
    /// Query registered, first snapshot not yet delivered.
    Subscribing,
    /// Receiving snapshots.
    Active,
}

impl SubscriptionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Subscribing,
            2 => Self::Active,
            _ => Self::Unsubscribed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Unsubscribed => 0,
            Self::Subscribing => 1,
            Self::Active => 2,
        }
    }
}

/// A live listing of one collection under one parent, for one owner.
pub struct ListingSubscription {
    collection: Collection,
    state: Arc<AtomicU8>,
    registration: ListenerRegistration,
}

impl ListingSubscription {
    /// Open a live listing of `T` under `parent` owned by `owner`.
    ///
    /// `on_update` receives every snapshot in delivery order. Documents that
    /// cannot be formatted are skipped; the rest keep their order.
    pub fn subscribe<T, F>(
        gateway: &dyn DocumentGateway,
        parent: Option<&FolderId>,
        owner: &UserId,
        on_update: F,
    ) -> AppResult<Self>
    where
        T: Listable,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let collection = T::COLLECTION;
        let query = ListenQuery::children_of(collection, parent, owner);
        let state = Arc::new(AtomicU8::new(SubscriptionState::Subscribing.as_u8()));

        let callback_state = Arc::clone(&state);
        let registration = gateway.listen(
            query,
            Arc::new(move |docs: Vec<Document>| {
                let _ = callback_state.compare_exchange(
                    SubscriptionState::Subscribing.as_u8(),
                    SubscriptionState::Active.as_u8(),
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                );
                on_update(format_snapshot::<T>(docs));
            }),
        )?;

        debug!(%collection, parent = ?parent, %owner, "Listing subscribed");
        Ok(Self {
            collection,
            state,
            registration,
        })
    }

    /// Stop further updates. Idempotent.
    pub fn unsubscribe(&self) {
        self.registration.remove();
        let previous = self
            .state
            .swap(SubscriptionState::Unsubscribed.as_u8(), Ordering::SeqCst);
        if previous != SubscriptionState::Unsubscribed.as_u8() {
            debug!(collection = %self.collection, "Listing unsubscribed");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        SubscriptionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Collection this listing reads.
    pub fn collection(&self) -> Collection {
        self.collection
    }
}

impl Drop for ListingSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for ListingSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingSubscription")
            .field("collection", &self.collection)
            .field("state", &self.state())
            .finish()
    }
}

fn format_snapshot<T: Listable>(docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match T::try_from(doc) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(collection = %T::COLLECTION, doc_id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}
