//! Core traits defined in `drive-core` and implemented by other crates.

pub mod gateway;

pub use gateway::{DocumentGateway, ListenerRegistration, SnapshotCallback};
