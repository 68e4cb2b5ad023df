//! # drive-sync
//!
//! Folder-navigation state synchronizer for Drive. Given a target folder it:
//!
//! - resolves the folder's metadata, falling back to the root sentinel
//! - keeps live listings of its child folders and child files for the
//!   current owner
//! - re-subscribes whenever the folder or owner changes, disposing the
//!   previous generation's lookup and listeners first
//!
//! [`FolderStateStore`] is the single-owner state machine; [`Navigator`]
//! runs one in its own task behind a command channel.

pub mod listing;
pub mod navigator;
pub mod resolver;
pub mod state;
pub mod store;

pub use listing::{Listable, ListingSubscription, SubscriptionState};
pub use navigator::{Navigator, NavigatorHandle};
pub use resolver::FolderResolver;
pub use state::{FolderAction, NavigationState, reduce};
pub use store::{FolderStateStore, Generation};
