//! # drive-core
//!
//! Core crate for Drive. Contains the document gateway trait, configuration
//! schemas, opaque identifiers, live-query types, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Drive crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
