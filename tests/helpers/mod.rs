//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use drive_core::config::sync::SyncConfig;
use drive_core::types::UserId;
use drive_gateway::{MemoryDocumentStore, Seed};
use drive_sync::{FolderStateStore, NavigationState};

/// Quiet period after which a test store is considered settled.
pub const IDLE: Duration = Duration::from_millis(50);

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";

pub fn alice() -> UserId {
    UserId::new(ALICE)
}

pub fn bob() -> UserId {
    UserId::new(BOB)
}

const SEED: &str = include_str!("../fixtures/seed.json");

/// A gateway loaded with the shared fixture tree.
pub fn gateway() -> Arc<MemoryDocumentStore> {
    let seed = Seed::from_json(SEED).expect("Fixture seed must parse");
    Arc::new(MemoryDocumentStore::from_seed(seed))
}

/// A store over `gateway` owned by `owner`.
pub fn store(gateway: &Arc<MemoryDocumentStore>, owner: Option<&str>) -> FolderStateStore {
    store_with_config(gateway, owner, &SyncConfig::default())
}

pub fn store_with_config(
    gateway: &Arc<MemoryDocumentStore>,
    owner: Option<&str>,
    config: &SyncConfig,
) -> FolderStateStore {
    FolderStateStore::new(gateway.clone(), owner.map(UserId::new), config)
}

/// Child folder names in listing order.
pub fn folder_names(state: &NavigationState) -> Vec<&str> {
    state.child_folders.iter().map(|f| f.name.as_str()).collect()
}

/// Child file names in listing order.
pub fn file_names(state: &NavigationState) -> Vec<&str> {
    state.child_files.iter().map(|f| f.name.as_str()).collect()
}

/// Name of the active folder, if resolved.
pub fn folder_name(state: &NavigationState) -> Option<&str> {
    state.folder.as_ref().map(|f| f.name.as_str())
}
