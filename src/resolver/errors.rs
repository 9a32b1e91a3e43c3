//! Resolver error types
//!
//! Error codes:
//! - REVIEW_INVALID_ARGUMENT (FATAL, programmer error)
//! - REVIEW_STORAGE_FAILURE (ERROR, propagated from a collaborator)
//! - REVIEW_CANCELLED (ERROR)
//! - REVIEW_DEADLINE_EXCEEDED (ERROR)
//!
//! Not-found conditions never surface as resolver errors; they are
//! recovered locally as omission or fallback.

use thiserror::Error;

/// Result type for collaborator calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("No content provider registered for '{0}'")]
    ProviderMissing(String),
}

impl StoreError {
    pub fn not_found(what: impl ToString) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// True for existence failures, which callers recover from locally.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ResolverError>;

/// Resolver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Resolution cancelled before {0}")]
    Cancelled(&'static str),

    #[error("Resolution deadline exceeded before {0}")]
    DeadlineExceeded(&'static str),
}

impl ResolverError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ResolverError::InvalidArgument(_) => "REVIEW_INVALID_ARGUMENT",
            ResolverError::Storage(_) => "REVIEW_STORAGE_FAILURE",
            ResolverError::Cancelled(_) => "REVIEW_CANCELLED",
            ResolverError::DeadlineExceeded(_) => "REVIEW_DEADLINE_EXCEEDED",
        }
    }

    /// Argument errors indicate a caller bug rather than missing data.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResolverError::InvalidArgument(_))
    }
}

/// Maps a not-found failure to `None`, keeping every other failure.
pub(crate) fn recover_not_found<T>(result: StoreResult<T>) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
