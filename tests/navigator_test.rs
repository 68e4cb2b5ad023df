//! Integration tests for the navigator task.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use drive_core::types::FolderId;
use drive_entity::Folder;
use drive_sync::{NavigationState, Navigator};

use helpers::{folder_name, folder_names};

async fn settle(
    rx: &mut watch::Receiver<Arc<NavigationState>>,
    predicate: impl Fn(&NavigationState) -> bool,
) -> Arc<NavigationState> {
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| predicate(s)))
        .await
        .expect("State did not settle in time")
        .expect("Navigator stopped");
    Arc::clone(&state)
}

#[tokio::test]
async fn test_navigator_follows_selection_and_identity() {
    let gateway = helpers::gateway();
    let (identity_tx, identity_rx) = watch::channel(None);
    let navigator = Navigator::spawn(helpers::store(&gateway, None), identity_rx, 4);
    let mut rx = navigator.state();

    navigator.select(Some(FolderId::new("F1")), None).await.unwrap();
    let state = settle(&mut rx, |s| folder_name(s) == Some("Projects")).await;
    assert!(state.child_folders.is_empty());
    assert_eq!(gateway.listener_count(), 0);

    identity_tx.send(Some(helpers::alice())).unwrap();
    let state = settle(&mut rx, |s| s.child_folders.len() == 2).await;
    assert_eq!(folder_names(&state), vec!["Alpha", "Beta"]);

    identity_tx.send(Some(helpers::bob())).unwrap();
    let state = settle(&mut rx, |s| folder_names(s) == vec!["Bob's Notes"]).await;
    assert_eq!(state.child_files.len(), 1);

    navigator.shutdown().await.unwrap();
    assert_eq!(gateway.listener_count(), 0);
}

#[tokio::test]
async fn test_rapid_selection_settles_on_last_target() {
    let gateway = helpers::gateway();
    gateway.set_lookup_delay(Duration::from_millis(20));
    let (_identity_tx, identity_rx) = watch::channel(Some(helpers::alice()));
    let navigator = Navigator::spawn(helpers::store(&gateway, None), identity_rx, 16);
    let mut rx = navigator.state();

    for target in ["F1", "F2", "F1", "F2"] {
        navigator.select(Some(FolderId::new(target)), None).await.unwrap();
    }
    let state = settle(&mut rx, |s| {
        folder_name(s) == Some("Archive") && folder_names(s) == vec!["Old"]
    })
    .await;
    assert_eq!(state.folder_id, Some(FolderId::new("F2")));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(navigator.current().folder_id, Some(FolderId::new("F2")));
    assert_eq!(folder_name(&navigator.current()), Some("Archive"));

    navigator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_final_snapshot_readable_after_shutdown() {
    let gateway = helpers::gateway();
    let (_identity_tx, identity_rx) = watch::channel(Some(helpers::alice()));
    let navigator = Navigator::spawn(helpers::store(&gateway, None), identity_rx, 1);
    let mut rx = navigator.state();
    navigator.select(None, None).await.unwrap();
    settle(&mut rx, |s| s.child_files.len() == 1).await;

    let state = navigator.state();
    navigator.shutdown().await.unwrap();

    assert!(state.borrow().is_root());
    assert_eq!(gateway.listener_count(), 0);
}

#[tokio::test]
async fn test_dropped_identity_keeps_owner() {
    let gateway = helpers::gateway();
    let (identity_tx, identity_rx) = watch::channel(Some(helpers::alice()));
    let navigator = Navigator::spawn(helpers::store(&gateway, None), identity_rx, 4);
    let mut rx = navigator.state();
    drop(identity_tx);

    navigator.select(Some(FolderId::new("F1")), None).await.unwrap();
    let state = settle(&mut rx, |s| s.child_folders.len() == 2).await;
    assert_eq!(folder_names(&state), vec!["Alpha", "Beta"]);

    navigator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_navigator_without_identity_starts_at_root() {
    let gateway = helpers::gateway();
    let (_identity_tx, identity_rx) = watch::channel(None);
    let navigator = Navigator::spawn(helpers::store(&gateway, None), identity_rx, 4);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = navigator.current();
    assert!(state.folder_id.is_none());
    assert_eq!(state.folder, Some(Folder::root()));
    assert_eq!(gateway.listener_count(), 0);

    navigator.shutdown().await.unwrap();
}
