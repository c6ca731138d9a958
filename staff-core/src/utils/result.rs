//! Unified Result Types

use crate::utils::AppError;

/// Application-level Result type
///
/// Used by the engines, services and the public API surface
pub type AppResult<T> = Result<T, AppError>;
