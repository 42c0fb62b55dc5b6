//! Convenience result type alias for JoeView.

use crate::error::AppError;

/// A specialized `Result` type for JoeView operations.
pub type AppResult<T> = Result<T, AppError>;
