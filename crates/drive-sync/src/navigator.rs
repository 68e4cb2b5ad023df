//! Navigator task: runs a [`FolderStateStore`] behind a command channel.
//!
//! The task is the single cooperative context in which all state mutation
//! happens. It multiplexes three inputs: navigation commands, identity
//! changes, and the store's own effect events.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::{FolderId, UserId};
use drive_entity::Folder;

use crate::state::NavigationState;
use crate::store::FolderStateStore;

/// Commands accepted by the navigator task.
#[derive(Debug)]
enum NavigatorCommand {
    /// Navigate to a folder.
    Select {
        folder_id: Option<FolderId>,
        hint: Option<Folder>,
    },
    /// Dispose all subscriptions and stop.
    Shutdown,
}

/// Spawns navigator tasks.
#[derive(Debug)]
pub struct Navigator;

impl Navigator {
    /// Run `store` in its own task.
    ///
    /// `identity` supplies the current owner; every change becomes an owner
    /// reconfiguration of the store. If the identity sender is dropped the
    /// last owner is kept.
    pub fn spawn(
        store: FolderStateStore,
        identity: watch::Receiver<Option<UserId>>,
        buffer: usize,
    ) -> NavigatorHandle {
        let (commands_tx, commands_rx) = mpsc::channel(buffer.max(1));
        let state = store.subscribe();
        let task = tokio::spawn(run(store, commands_rx, identity));

        NavigatorHandle {
            commands: commands_tx,
            state,
            task,
        }
    }
}

/// Handle to a running navigator task.
#[derive(Debug)]
pub struct NavigatorHandle {
    commands: mpsc::Sender<NavigatorCommand>,
    state: watch::Receiver<Arc<NavigationState>>,
    task: JoinHandle<()>,
}

impl NavigatorHandle {
    /// Request navigation to `folder_id`, with optional already-known metadata.
    pub async fn select(&self, folder_id: Option<FolderId>, hint: Option<Folder>) -> AppResult<()> {
        self.commands
            .send(NavigatorCommand::Select { folder_id, hint })
            .await
            .map_err(|_| AppError::service_unavailable("Navigator has stopped"))
    }

    /// A receiver of state snapshots.
    pub fn state(&self) -> watch::Receiver<Arc<NavigationState>> {
        self.state.clone()
    }

    /// The latest state snapshot.
    pub fn current(&self) -> Arc<NavigationState> {
        Arc::clone(&self.state.borrow())
    }

    /// Stop the task after disposing every subscription.
    pub async fn shutdown(self) -> AppResult<()> {
        // Already stopped is fine; the join below reports real failures.
        let _ = self.commands.send(NavigatorCommand::Shutdown).await;
        self.task
            .await
            .map_err(|e| AppError::internal(format!("Navigator task failed: {e}")))
    }
}

async fn run(
    mut store: FolderStateStore,
    mut commands: mpsc::Receiver<NavigatorCommand>,
    mut identity: watch::Receiver<Option<UserId>>,
) {
    let owner = identity.borrow_and_update().clone();
    store.set_owner(owner);
    let mut identity_open = true;
    info!(owner = ?store.owner(), "Navigator started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(NavigatorCommand::Select { folder_id, hint }) => {
                    store.select(folder_id, hint);
                }
                Some(NavigatorCommand::Shutdown) | None => break,
            },
            changed = identity.changed(), if identity_open => match changed {
                Ok(()) => {
                    let owner = identity.borrow_and_update().clone();
                    store.set_owner(owner);
                }
                Err(_) => {
                    debug!("Identity source closed, keeping current owner");
                    identity_open = false;
                }
            },
            _ = store.next_update() => {}
        }
    }

    store.close();
    info!("Navigator stopped");
}
