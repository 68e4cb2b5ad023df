//! Integration tests for folder navigation against a seeded gateway.

mod helpers;

use std::time::Duration;

use drive_core::types::{Collection, FolderId};
use drive_entity::Folder;

use helpers::{ALICE, IDLE, file_names, folder_name, folder_names};

#[tokio::test]
async fn test_new_store_shows_root_sentinel() {
    let gateway = helpers::gateway();
    let store = helpers::store(&gateway, Some(ALICE));

    let state = store.current_state();
    assert!(state.folder_id.is_none());
    assert_eq!(state.folder, Some(Folder::root()));
    assert!(state.child_folders.is_empty());
    assert!(state.child_files.is_empty());
}

#[tokio::test]
async fn test_root_selection_is_immediate() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(None, None);

    let state = store.current_state();
    assert_eq!(state.folder, Some(Folder::root()));
    assert!(state.folder_id.is_none());
    assert!(state.child_folders.is_empty());
    assert!(state.child_files.is_empty());
    assert!(!store.is_resolving());
}

#[tokio::test]
async fn test_root_listings_arrive_after_selection() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(None, None);
    store.run_until_idle(IDLE).await;

    let state = store.current_state();
    assert_eq!(folder_names(&state), vec!["Archive", "Projects"]);
    assert_eq!(file_names(&state), vec!["readme.md"]);
}

#[tokio::test]
async fn test_existing_folder_resolves_with_owned_children() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(Some(FolderId::new("F1")), None);
    assert!(store.current_state().folder.is_none());
    store.run_until_idle(IDLE).await;

    let state = store.current_state();
    let folder = state.folder.as_ref().expect("folder resolved");
    assert_eq!(folder.id, Some(FolderId::new("F1")));
    assert_eq!(folder.name, "Projects");
    assert_eq!(folder_names(&state), vec!["Alpha", "Beta"]);
    assert_eq!(file_names(&state), vec!["y.pdf", "x.txt"]);
    assert_eq!(
        state.child_files[0].url.as_deref(),
        Some("https://files.example.com/y.pdf")
    );
}

#[tokio::test]
async fn test_path_blob_and_rfc3339_timestamps_are_accepted() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(Some(FolderId::new("F2")), None);
    store.run_until_idle(IDLE).await;

    let state = store.current_state();
    assert_eq!(folder_names(&state), vec!["Old"]);
    let old = &state.child_folders[0];
    assert_eq!(old.path.len(), 2);
    assert_eq!(old.path[1].id, Some(FolderId::new("F2")));
    assert!(old.created_at.is_some());
}

#[tokio::test]
async fn test_children_sort_by_instant_across_timestamp_formats() {
    let gateway = helpers::gateway();
    // 250 ms after the epoch, written with an offset: between Alpha (200) and Beta (300).
    let serde_json::Value::Object(data) = serde_json::json!({
        "name": "Between",
        "parentId": "F1",
        "userId": ALICE,
        "createdAt": "1970-01-01T01:00:00.250+01:00"
    }) else {
        unreachable!()
    };
    gateway.put(Collection::Folders, drive_core::types::Document::new("C4", data));
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(Some(FolderId::new("F1")), None);
    store.run_until_idle(IDLE).await;

    assert_eq!(
        folder_names(&store.current_state()),
        vec!["Alpha", "Between", "Beta"]
    );
}

#[tokio::test]
async fn test_deleted_folder_falls_back_to_root() {
    let gateway = helpers::gateway();
    gateway.delete(Collection::Folders, "F1").unwrap();
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(Some(FolderId::new("F1")), None);
    store.run_until_idle(IDLE).await;

    let state = store.current_state();
    assert_eq!(state.folder, Some(Folder::root()));
    assert_eq!(state.folder_id, Some(FolderId::new("F1")));
}

#[tokio::test]
async fn test_denied_folder_falls_back_to_root() {
    let gateway = helpers::gateway();
    gateway.deny(Collection::Folders, "F1");
    let mut store = helpers::store(&gateway, Some(ALICE));

    store.select(Some(FolderId::new("F1")), None);
    store.run_until_idle(IDLE).await;

    let state = store.current_state();
    assert_eq!(state.folder, Some(Folder::root()));
    // Listings are independent of the lookup outcome.
    assert_eq!(folder_names(&state), vec!["Alpha", "Beta"]);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_selection_is_discarded() {
    let gateway = helpers::gateway();
    gateway.set_lookup_delay(Duration::from_millis(100));
    let mut store = helpers::store(&gateway, Some(ALICE));

    let hint = Folder {
        id: Some(FolderId::new("F1")),
        name: "Projects (cached)".to_string(),
        ..Folder::root()
    };
    store.select(Some(FolderId::new("F1")), Some(hint));
    assert_eq!(folder_name(&store.current_state()), Some("Projects (cached)"));
    store.select(Some(FolderId::new("F2")), None);

    store.run_until_idle(Duration::from_secs(1)).await;

    let state = store.current_state();
    assert_eq!(state.folder_id, Some(FolderId::new("F2")));
    assert_eq!(folder_name(&state), Some("Archive"));
    assert_eq!(folder_names(&state), vec!["Old"]);
    assert!(state.child_files.is_empty());
    assert_eq!(gateway.listener_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_lookup_times_out_to_root() {
    let gateway = helpers::gateway();
    gateway.set_lookup_delay(Duration::from_secs(60));
    let config = drive_core::config::sync::SyncConfig {
        lookup_timeout_ms: 500,
        ..Default::default()
    };
    let mut store = helpers::store_with_config(&gateway, Some(ALICE), &config);

    store.select(Some(FolderId::new("F1")), None);
    store.run_until_idle(Duration::from_secs(5)).await;

    let state = store.current_state();
    assert_eq!(state.folder, Some(Folder::root()));
    assert_eq!(folder_names(&state), vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn test_snapshots_apply_in_delivery_order() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));
    store.select(Some(FolderId::new("F1")), None);
    store.run_until_idle(IDLE).await;
    let projects = store.current_state().folder.clone().expect("resolved");

    // Two snapshots queue up before the store folds either.
    gateway.create_folder("Gamma", &projects, &helpers::alice()).unwrap();
    gateway.delete(Collection::Folders, "C1").unwrap();

    assert!(store.next_update().await);
    assert_eq!(folder_names(&store.current_state()), vec!["Alpha", "Beta", "Gamma"]);
    assert!(store.next_update().await);
    assert_eq!(folder_names(&store.current_state()), vec!["Beta", "Gamma"]);
}

#[tokio::test]
async fn test_live_changes_reach_state() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));
    store.select(None, None);
    store.run_until_idle(IDLE).await;

    gateway
        .create_file("notes.txt", &Folder::root(), &helpers::alice(), None)
        .unwrap();
    gateway
        .create_file("elsewhere.txt", &Folder::root(), &helpers::bob(), None)
        .unwrap();
    store.run_until_idle(IDLE).await;

    assert_eq!(file_names(&store.current_state()), vec!["readme.md", "notes.txt"]);
}

#[tokio::test]
async fn test_returning_to_root_always_shows_sentinel() {
    let gateway = helpers::gateway();
    let mut store = helpers::store(&gateway, Some(ALICE));

    for target in ["F1", "F2", "missing"] {
        store.select(Some(FolderId::new(target)), None);
        store.run_until_idle(IDLE).await;
        store.select(None, None);
        assert_eq!(store.current_state().folder, Some(Folder::root()));
    }
}
