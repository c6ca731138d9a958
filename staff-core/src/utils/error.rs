//! Unified Error Handling
//!
//! Provides the application-level error type used by the engines and
//! services. Repository-level failures ([`crate::db::repository::RepoError`])
//! are converted at the service boundary so callers only ever see
//! [`AppError`].

use crate::db::repository::RepoError;

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Convenient constructors ==========

impl AppError {
    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a Conflict error
    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict(resource.into())
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a BusinessRule error
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule(message.into())
    }

    /// Create a Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable code string for callers that map errors to a transport
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E0003",
            Self::Conflict(_) => "E0004",
            Self::Validation(_) => "E0002",
            Self::BusinessRule(_) => "E0005",
            Self::Database(_) => "E9002",
            Self::Internal(_) => "E9001",
        }
    }

    /// True when the operation had no effect and is safe to retry as-is
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
