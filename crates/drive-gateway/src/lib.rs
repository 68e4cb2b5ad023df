//! # drive-gateway
//!
//! Document store gateways for Drive. Provides:
//!
//! - [`MemoryDocumentStore`], a single-process store with point lookups,
//!   live filtered queries, and change notification
//! - JSON seed loading for demos and tests
//! - Fault injection (denied documents, rejected queries, lookup latency)

pub mod memory;
pub mod seed;

pub use memory::MemoryDocumentStore;
pub use seed::Seed;
