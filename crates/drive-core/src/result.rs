//! Convenience result type alias for Drive.

use crate::error::AppError;

/// A specialized `Result` type for Drive operations.
pub type AppResult<T> = Result<T, AppError>;
