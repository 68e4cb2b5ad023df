//! In-memory document store.

mod faults;
mod listeners;
pub mod store;

pub use store::MemoryDocumentStore;
