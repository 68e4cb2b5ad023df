//! Folder State Store: the navigation state machine and its effects.
//!
//! The store owns the [`NavigationState`] and the resources of the current
//! *generation*, one (folder, owner) pairing. Every lookup result and
//! listing snapshot is tagged with the generation that produced it, and only
//! events tagged with the current generation are folded. Switching
//! generations first aborts the previous lookup, then closes both previous
//! listings, and only then creates the new generation's resources.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use drive_core::config::sync::SyncConfig;
use drive_core::traits::DocumentGateway;
use drive_core::types::{FolderId, UserId};
use drive_entity::{File, Folder};

use crate::listing::{Listable, ListingSubscription, SubscriptionState};
use crate::resolver::FolderResolver;
use crate::state::{FolderAction, NavigationState, reduce};

/// Monotonic counter identifying one (folder, owner) pairing.
pub type Generation = u64;

/// An action produced by an effect, stamped with its generation.
#[derive(Debug)]
pub(crate) struct TaggedAction {
    pub(crate) generation: Generation,
    pub(crate) action: FolderAction,
}

/// Resources owned by a single generation.
#[derive(Debug, Default)]
struct GenerationResources {
    lookup: Option<JoinHandle<()>>,
    child_folders: Option<ListingSubscription>,
    child_files: Option<ListingSubscription>,
}

impl GenerationResources {
    /// Abort the lookup, then close both listings.
    fn dispose(&mut self) {
        if let Some(lookup) = self.lookup.take() {
            lookup.abort();
        }
        if let Some(listing) = self.child_folders.take() {
            listing.unsubscribe();
        }
        if let Some(listing) = self.child_files.take() {
            listing.unsubscribe();
        }
    }
}

impl Drop for GenerationResources {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// The folder-navigation state machine.
///
/// All mutation happens through `&mut self`, so a store is driven from one
/// task at a time. Methods that start effects spawn onto the current Tokio
/// runtime and must be called from within one.
#[derive(Debug)]
pub struct FolderStateStore {
    gateway: Arc<dyn DocumentGateway>,
    resolver: FolderResolver,
    owner: Option<UserId>,
    generation: Generation,
    resources: GenerationResources,
    state: Arc<NavigationState>,
    snapshots: watch::Sender<Arc<NavigationState>>,
    inbox_tx: mpsc::UnboundedSender<TaggedAction>,
    inbox_rx: mpsc::UnboundedReceiver<TaggedAction>,
}

impl FolderStateStore {
    /// Create an idle store at the root with no effects running.
    ///
    /// Call [`select`](Self::select) to start navigating.
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        owner: Option<UserId>,
        config: &SyncConfig,
    ) -> Self {
        let resolver = FolderResolver::new(Arc::clone(&gateway), config.lookup_timeout());
        let state = Arc::new(NavigationState::root());
        let (snapshots, _) = watch::channel(Arc::clone(&state));
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Self {
            gateway,
            resolver,
            owner,
            generation: 0,
            resources: GenerationResources::default(),
            state,
            snapshots,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Navigate to `folder_id`, optionally showing `folder_hint` until the
    /// lookup verifies it.
    pub fn select(&mut self, folder_id: Option<FolderId>, folder_hint: Option<Folder>) {
        self.begin_generation();
        debug!(
            generation = self.generation,
            folder_id = ?folder_id,
            hinted = folder_hint.is_some(),
            "Selecting folder"
        );

        self.apply(FolderAction::SelectFolder {
            folder_id,
            folder: folder_hint,
        });
        self.start_resolution();
        self.start_listings();
    }

    /// Switch the owning user.
    ///
    /// Starts a new generation for the same folder: listings are cleared and
    /// reopened for the new owner, and a pending lookup is restarted. With no
    /// owner, listings stay empty until one is set.
    pub fn set_owner(&mut self, owner: Option<UserId>) {
        if self.owner == owner {
            return;
        }
        debug!(previous = ?self.owner, owner = ?owner, "Owner changed");

        self.begin_generation();
        self.owner = owner;

        self.apply(FolderAction::SetChildFolders {
            child_folders: Vec::new(),
        });
        self.apply(FolderAction::SetChildFiles {
            child_files: Vec::new(),
        });
        self.start_resolution();
        self.start_listings();
    }

    /// The latest state snapshot.
    pub fn current_state(&self) -> Arc<NavigationState> {
        Arc::clone(&self.state)
    }

    /// Receive every published state snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<NavigationState>> {
        self.snapshots.subscribe()
    }

    /// The current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The current owner, if any.
    pub fn owner(&self) -> Option<&UserId> {
        self.owner.as_ref()
    }

    /// Lifecycle of the (child folders, child files) listings.
    pub fn listing_states(&self) -> (SubscriptionState, SubscriptionState) {
        let state = |slot: &Option<ListingSubscription>| {
            slot.as_ref()
                .map_or(SubscriptionState::Unsubscribed, ListingSubscription::state)
        };
        (
            state(&self.resources.child_folders),
            state(&self.resources.child_files),
        )
    }

    /// Whether the current generation's lookup is still running.
    pub fn is_resolving(&self) -> bool {
        self.resources
            .lookup
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Fold every queued event without waiting. Returns how many applied.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tagged) = self.inbox_rx.try_recv() {
            if self.apply_tagged(tagged) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next queued event and fold it.
    ///
    /// Returns `false` if the event belonged to a superseded generation.
    pub async fn next_update(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(tagged) => self.apply_tagged(tagged),
            // The store holds a sender, so the inbox never closes.
            None => false,
        }
    }

    /// Fold events until none arrives for `idle`. Returns how many applied.
    pub async fn run_until_idle(&mut self, idle: Duration) -> usize {
        let mut applied = 0;
        while let Ok(Some(tagged)) = tokio::time::timeout(idle, self.inbox_rx.recv()).await {
            if self.apply_tagged(tagged) {
                applied += 1;
            }
        }
        applied
    }

    /// Dispose the current generation's lookup and listings.
    ///
    /// The last published state is left as it was, listings included.
    pub fn close(&mut self) {
        self.begin_generation();
    }

    /// Retire the current generation and open the next one.
    fn begin_generation(&mut self) {
        self.resources.dispose();
        self.generation += 1;
        trace!(generation = self.generation, "Generation started");
    }

    fn start_resolution(&mut self) {
        let folder_id = self.state.folder_id.clone();
        if let Some(root) = FolderResolver::resolve_immediate(folder_id.as_ref()) {
            self.apply(FolderAction::UpdateFolder { folder: root });
            return;
        }

        let resolver = self.resolver.clone();
        let tx = self.inbox_tx.clone();
        let generation = self.generation;
        self.resources.lookup = Some(tokio::spawn(async move {
            let folder = resolver.resolve(folder_id.as_ref()).await;
            let _ = tx.send(TaggedAction {
                generation,
                action: FolderAction::UpdateFolder { folder },
            });
        }));
    }

    fn start_listings(&mut self) {
        let Some(owner) = self.owner.clone() else {
            debug!(generation = self.generation, "No owner yet, deferring listings");
            return;
        };
        let parent = self.state.folder_id.clone();
        let generation = self.generation;

        let tx = self.inbox_tx.clone();
        self.resources.child_folders =
            self.open_listing::<Folder, _>(parent.as_ref(), &owner, move |child_folders| {
                let _ = tx.send(TaggedAction {
                    generation,
                    action: FolderAction::SetChildFolders { child_folders },
                });
            });

        let tx = self.inbox_tx.clone();
        self.resources.child_files =
            self.open_listing::<File, _>(parent.as_ref(), &owner, move |child_files| {
                let _ = tx.send(TaggedAction {
                    generation,
                    action: FolderAction::SetChildFiles { child_files },
                });
            });
    }

    /// Open one listing; a rejected query leaves the slot empty.
    fn open_listing<T, F>(
        &self,
        parent: Option<&FolderId>,
        owner: &UserId,
        on_update: F,
    ) -> Option<ListingSubscription>
    where
        T: Listable,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let gateway = self.gateway.as_ref();
        match ListingSubscription::subscribe::<T, F>(gateway, parent, owner, on_update) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(
                    generation = self.generation,
                    collection = %T::COLLECTION,
                    error = %e,
                    "Failed to open listing, it stays empty until the next selection"
                );
                None
            }
        }
    }

    fn apply_tagged(&mut self, tagged: TaggedAction) -> bool {
        if tagged.generation != self.generation {
            trace!(
                stale = tagged.generation,
                current = self.generation,
                kind = tagged.action.kind(),
                "Discarding event from superseded generation"
            );
            return false;
        }
        self.apply(tagged.action);
        true
    }

    fn apply(&mut self, action: FolderAction) {
        trace!(generation = self.generation, kind = action.kind(), "Applying action");
        self.state = Arc::new(reduce(&self.state, action));
        self.snapshots.send_replace(Arc::clone(&self.state));
    }
}
