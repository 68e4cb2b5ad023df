//! Core type definitions used across the Drive workspace.

pub mod document;
pub mod filter;
pub mod id;
pub mod query;
pub mod sorting;

pub use document::{Collection, Document};
pub use filter::{FilterField, FilterValue};
pub use id::*;
pub use query::ListenQuery;
pub use sorting::SortField;
